//
//  sonar-web-api
//  api/branches.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Project Branches API
//!
//! Branch and pull request listing, deletion and main-branch renaming.
//!
//! ## API Endpoints
//!
//! ```text
//! GET  /api/project_branches/list    project
//! POST /api/project_branches/delete  project, branch?, pullRequest?
//! POST /api/project_branches/rename  project, name
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use sonar_web_api::api::SonarClient;
//! use sonar_web_api::api::branches::DeleteBranchRequest;
//!
//! # async fn example() -> Result<(), sonar_web_api::api::ApiError> {
//! let client = SonarClient::new("https://sonar.example.com")?;
//!
//! for branch in client.get_branches("my-project").await? {
//!     println!("{}", branch.display_name());
//! }
//!
//! client
//!     .delete_branch(&DeleteBranchRequest::for_branch("my-project", "feature/old"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::client::SonarClient;
use super::common::{sonar_date, ApiError};
use super::fixtures;

const LIST_PATH: &str = "/api/project_branches/list";
const DELETE_PATH: &str = "/api/project_branches/delete";
const RENAME_PATH: &str = "/api/project_branches/rename";

/// Either a branch or a pull request under analysis.
///
/// The server mixes both kinds in one list without a discriminator field.
/// A record carrying `base` is a pull request and must decode as one; any
/// other record is a branch. A record that fails the shape it was routed to
/// fails to decode with [`ApiError::Schema`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BranchLike {
    PullRequest(PullRequest),
    Branch(Branch),
}

impl<'de> Deserialize<'de> for BranchLike {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        if value.get("base").is_some() {
            PullRequest::deserialize(value)
                .map(BranchLike::PullRequest)
                .map_err(|e| D::Error::custom(format!("invalid pull request: {e}")))
        } else {
            Branch::deserialize(value)
                .map(BranchLike::Branch)
                .map_err(|e| D::Error::custom(format!("invalid branch: {e}")))
        }
    }
}

/// Long-living or short-living branch classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BranchType {
    Long,
    Short,
    Branch,
    #[serde(other)]
    Unknown,
}

/// A version-control branch tracked by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,

    #[serde(default)]
    pub is_main: bool,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub branch_type: Option<BranchType>,

    /// Target branch of a short-living branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_branch: Option<String>,

    #[serde(default, with = "sonar_date")]
    pub analysis_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BranchStatus>,
}

/// Status summary attached to a branch.
///
/// Long-living branches report a quality gate, short-living ones report
/// issue counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_gate_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bugs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_smells: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerabilities: Option<u32>,
}

/// A pull request with its own analysis results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    #[serde(default, with = "sonar_date")]
    pub analysis_date: Option<DateTime<Utc>>,

    /// Branch the pull request merges into.
    pub base: String,

    /// Source branch of the pull request.
    pub branch: String,

    #[serde(alias = "key")]
    pub id: String,

    #[serde(alias = "title")]
    pub name: String,

    #[serde(default)]
    pub status: PullRequestStatus,
}

/// Issue counts for a pull request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestStatus {
    #[serde(default)]
    pub bugs: u32,
    #[serde(default)]
    pub code_smells: u32,
    #[serde(default)]
    pub vulnerabilities: u32,
}

/// Query parameters that scope a request to one branch or pull request.
///
/// Empty for the main branch, which is the server's default scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<String>,
}

impl BranchLike {
    /// Name suitable for display: the branch name, or `id - title` for a pull request.
    pub fn display_name(&self) -> String {
        match self {
            Self::Branch(b) => b.name.clone(),
            Self::PullRequest(pr) => format!("{} - {}", pr.id, pr.name),
        }
    }

    pub fn is_main(&self) -> bool {
        matches!(self, Self::Branch(b) if b.is_main)
    }

    pub fn is_pull_request(&self) -> bool {
        matches!(self, Self::PullRequest(_))
    }

    pub fn analysis_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Branch(b) => b.analysis_date,
            Self::PullRequest(pr) => pr.analysis_date,
        }
    }

    /// Parameters that scope other requests (measures, issues) to this branch-like.
    pub fn query(&self) -> BranchParameters {
        match self {
            Self::Branch(b) if b.is_main => BranchParameters::default(),
            Self::Branch(b) => BranchParameters {
                branch: Some(b.name.clone()),
                pull_request: None,
            },
            Self::PullRequest(pr) => BranchParameters {
                branch: None,
                pull_request: Some(pr.id.clone()),
            },
        }
    }
}

/// Form body of a delete request.
///
/// `branch` and `pull_request` are meant to be mutually exclusive, but that
/// is for the server to enforce: whatever is set gets sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBranchRequest {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<String>,
}

impl DeleteBranchRequest {
    pub fn for_branch(project: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            branch: Some(branch.into()),
            pull_request: None,
        }
    }

    pub fn for_pull_request(project: impl Into<String>, pull_request: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            branch: None,
            pull_request: Some(pull_request.into()),
        }
    }
}

#[derive(Deserialize)]
struct BranchListResponse {
    branches: Vec<BranchLike>,
}

impl SonarClient {
    /// Lists the branches and pull requests of a project.
    ///
    /// Returns exactly what the server lists. In mock mode the sample pull
    /// requests from [`fixtures::sample_pull_requests`] follow the server
    /// entries.
    pub async fn get_branches(&self, project: &str) -> Result<Vec<BranchLike>, ApiError> {
        let response: BranchListResponse =
            self.get_json(LIST_PATH, &[("project", project)]).await?;

        let mut branches = response.branches;
        if self.is_mock_mode() {
            debug!(project, "mock mode: appending sample pull requests");
            branches.extend(
                fixtures::sample_pull_requests()
                    .into_iter()
                    .map(BranchLike::PullRequest),
            );
        }

        Ok(branches)
    }

    /// Deletes a branch or a pull request analysis.
    pub async fn delete_branch(&self, request: &DeleteBranchRequest) -> Result<(), ApiError> {
        self.post(DELETE_PATH, request).await
    }

    /// Renames the main branch of a project.
    pub async fn rename_branch(&self, project: &str, name: &str) -> Result<(), ApiError> {
        self.post(RENAME_PATH, &[("project", project), ("name", name)])
            .await
    }
}
