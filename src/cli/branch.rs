//
//  sonar-web-api
//  cli/branch.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Branch commands
//!
//! List the branches and pull requests of a project, delete one of them, or
//! rename the main branch.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::branches::{BranchLike, DeleteBranchRequest};
use crate::config::Config;
use crate::output::{format_count, format_status, OutputWriter, TableBuilder, TableOutput};
use crate::util::{format_analysis_date, truncate};

use super::GlobalOptions;

/// Manage project branches and pull requests
#[derive(Args, Debug)]
pub struct BranchCommand {
    #[command(subcommand)]
    pub command: BranchSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BranchSubcommand {
    /// List branches and pull requests
    #[command(visible_alias = "ls")]
    List,

    /// Delete a branch or pull request analysis
    Delete(DeleteArgs),

    /// Rename the main branch
    Rename(RenameArgs),
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: DeleteTarget,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Exactly one of a branch or a pull request.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct DeleteTarget {
    /// Branch name
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    /// Pull request id
    #[arg(long)]
    pub pull_request: Option<String>,
}

impl DeleteTarget {
    fn request(&self, project: String) -> DeleteBranchRequest {
        DeleteBranchRequest {
            project,
            branch: self.branch.clone(),
            pull_request: self.pull_request.clone(),
        }
    }

    fn describe(&self) -> String {
        match (&self.branch, &self.pull_request) {
            (Some(branch), _) => format!("branch {}", branch),
            (None, pr) => format!("pull request {}", pr.as_deref().unwrap_or("-")),
        }
    }
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// New name of the main branch
    pub name: String,
}

#[derive(Serialize)]
#[serde(transparent)]
struct BranchList(Vec<BranchLike>);

impl TableOutput for BranchList {
    fn print_table(&self, color: bool) {
        if self.0.is_empty() {
            println!("No branches found.");
            return;
        }

        let rows = self.0.iter().map(|b| {
            let kind = match b {
                BranchLike::Branch(branch) if branch.is_main => "main".to_string(),
                BranchLike::Branch(branch) => branch
                    .branch_type
                    .map(|t| format!("{:?}", t).to_lowercase())
                    .unwrap_or_else(|| "branch".to_string()),
                BranchLike::PullRequest(pr) => format!("pr -> {}", pr.base),
            };

            [
                truncate(&b.display_name(), 60),
                kind,
                status_summary(b, color),
                format_analysis_date(b.analysis_date()),
            ]
        });

        TableBuilder::new()
            .color(color)
            .headers(["Name", "Type", "Status", "Analyzed"])
            .rows(rows)
            .print();
    }
}

fn status_summary(branch: &BranchLike, color: bool) -> String {
    let counts = |bugs: u32, smells: u32, vulns: u32| {
        format!(
            "{}, {}, {}",
            count_label(bugs, "bug", "bugs", color),
            count_label(vulns, "vulnerability", "vulnerabilities", color),
            count_label(smells, "code smell", "code smells", false)
        )
    };

    match branch {
        BranchLike::PullRequest(pr) => {
            counts(pr.status.bugs, pr.status.code_smells, pr.status.vulnerabilities)
        }
        BranchLike::Branch(b) => match &b.status {
            Some(status) => match &status.quality_gate_status {
                Some(gate) => format_status(gate, color),
                None => counts(
                    status.bugs.unwrap_or(0),
                    status.code_smells.unwrap_or(0),
                    status.vulnerabilities.unwrap_or(0),
                ),
            },
            None => "-".to_string(),
        },
    }
}

fn count_label(count: u32, one: &str, many: &str, color: bool) -> String {
    format!(
        "{} {}",
        format_count(count, color),
        if count == 1 { one } else { many }
    )
}

impl BranchCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;

        match &self.command {
            BranchSubcommand::List => self.list(&config, global).await,
            BranchSubcommand::Delete(args) => self.delete(args, &config, global).await,
            BranchSubcommand::Rename(args) => self.rename(args, &config, global).await,
        }
    }

    async fn list(&self, config: &Config, global: &GlobalOptions) -> Result<()> {
        let client = global.client(config)?;
        let project = global.project(config)?;

        let branches = client.get_branches(&project).await?;
        OutputWriter::from_flag(global.json).write(&BranchList(branches))
    }

    async fn delete(&self, args: &DeleteArgs, config: &Config, global: &GlobalOptions) -> Result<()> {
        let client = global.client(config)?;
        let project = global.project(config)?;

        if !args.yes {
            bail!("Deleting removes all analyses of the branch. Re-run with --yes to confirm.");
        }

        let request = args.target.request(project);
        client.delete_branch(&request).await?;

        report_done(
            global,
            &format!("Deleted {} of {}", args.target.describe(), request.project),
        )
    }

    async fn rename(&self, args: &RenameArgs, config: &Config, global: &GlobalOptions) -> Result<()> {
        let client = global.client(config)?;
        let project = global.project(config)?;

        client.rename_branch(&project, &args.name).await?;

        let color = console::colors_enabled();
        let name = if color {
            style(&args.name).cyan().to_string()
        } else {
            args.name.clone()
        };
        report_done(global, &format!("Renamed main branch of {} to {}", project, name))
    }
}

fn report_done(global: &GlobalOptions, message: &str) -> Result<()> {
    if global.json {
        crate::output::write_json(&serde_json::json!({ "success": true }))
    } else {
        OutputWriter::from_flag(false).write_success(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::sample_pull_requests;

    #[test]
    fn test_status_summary_for_pull_request() {
        let pr = BranchLike::PullRequest(sample_pull_requests().remove(0));
        assert_eq!(
            status_summary(&pr, false),
            "1 bug, 0 vulnerabilities, 3 code smells"
        );
    }

    #[test]
    fn test_status_summary_singular_and_plural() {
        let branch: BranchLike = serde_json::from_str(
            r#"{"name":"feature/x","status":{"bugs":2,"codeSmells":1,"vulnerabilities":1}}"#,
        )
        .unwrap();
        assert_eq!(
            status_summary(&branch, false),
            "2 bugs, 1 vulnerability, 1 code smell"
        );
    }

    #[test]
    fn test_delete_target_description() {
        let target = DeleteTarget {
            branch: None,
            pull_request: Some("42".into()),
        };
        assert_eq!(target.describe(), "pull request 42");
        let request = target.request("demo".into());
        assert_eq!(request.pull_request.as_deref(), Some("42"));
        assert_eq!(request.branch, None);
    }

    #[test]
    fn test_delete_requires_exactly_one_target() {
        use clap::Parser;
        use crate::cli::Cli;

        let neither = Cli::try_parse_from(["sq", "branch", "delete", "--yes"]);
        assert!(neither.is_err());

        let both = Cli::try_parse_from([
            "sq", "branch", "delete", "--yes", "--branch", "feat", "--pull-request", "42",
        ]);
        assert!(both.is_err());

        let one = Cli::try_parse_from(["sq", "branch", "delete", "--pull-request", "42"]);
        assert!(one.is_ok());
    }

    #[test]
    fn test_status_summary_for_gate() {
        let branch: BranchLike = serde_json::from_str(
            r#"{"name":"master","isMain":true,"status":{"qualityGateStatus":"ERROR"}}"#,
        )
        .unwrap();
        assert_eq!(status_summary(&branch, false), "ERROR");
    }
}
