//
//  sonar-web-api
//  api/fixtures.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Sample pull requests served in mock mode.
//!
//! These records never come from a server. [`SonarClient::get_branches`]
//! appends them only when the client was built with
//! [`ClientOptions::mock_mode`](super::ClientOptions::mock_mode) set.
//!
//! [`SonarClient::get_branches`]: super::SonarClient::get_branches

use chrono::{TimeZone, Utc};

use super::branches::{PullRequest, PullRequestStatus};

fn sample(
    id: &str,
    name: &str,
    branch: &str,
    base: &str,
    status: PullRequestStatus,
) -> PullRequest {
    PullRequest {
        analysis_date: Utc.with_ymd_and_hms(2017, 1, 2, 0, 0, 0).single(),
        base: base.to_string(),
        branch: branch.to_string(),
        id: id.to_string(),
        name: name.to_string(),
        status,
    }
}

/// Returns the three sample pull requests, in listing order.
///
/// The last one targets a base branch that does not exist, which exercises
/// the "orphan pull request" rendering path.
pub fn sample_pull_requests() -> Vec<PullRequest> {
    vec![
        sample(
            "2734",
            "SONAR-10374 Support pull request in the web app",
            "feature/stas/pr-api",
            "master",
            PullRequestStatus {
                bugs: 1,
                code_smells: 3,
                vulnerabilities: 0,
            },
        ),
        sample(
            "2725",
            "fix critical LTS issue",
            "feature/stas/my-bug-fix",
            "branch-6.7",
            PullRequestStatus::default(),
        ),
        sample(
            "9999",
            "create orphan pull request",
            "feature/stas/unknown-branch",
            "unknown-branch",
            PullRequestStatus::default(),
        ),
    ]
}
