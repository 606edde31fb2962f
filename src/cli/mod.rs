//
//  sonar-web-api
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod branch;
mod completion;
mod config;
mod measure;

pub use branch::BranchCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use measure::MeasureCommand;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::api::{ApiError, SonarClient};
use crate::config::{normalize_server_url, Config};

/// sq - Query SonarQube branches and measures from the command line
#[derive(Parser, Debug)]
#[command(
    name = "sq",
    version,
    about = "Query SonarQube branches and measures from the command line",
    propagate_version = true,
    after_help = "Use 'sq <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// SonarQube server URL
    #[arg(long, short = 's', global = true, env = "SQ_SERVER")]
    pub server: Option<String>,

    /// Project key for the operation
    #[arg(long, short = 'p', global = true, env = "SQ_PROJECT")]
    pub project: Option<String>,

    /// Append sample pull requests to branch listings
    #[arg(long, global = true)]
    pub mock: bool,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Builds a client from the config file, with command-line overrides applied.
    pub fn client(&self, config: &Config) -> Result<SonarClient> {
        let mut server = config.server.clone();
        if let Some(url) = &self.server {
            server.url = Some(normalize_server_url(url));
        }
        server.mock_mode |= self.mock;

        // main prints the error; keep the sink quiet unless debugging.
        Ok(SonarClient::from_config(&server)?
            .with_error_sink(|error: &ApiError| tracing::debug!(%error, "request failed")))
    }

    /// Resolves the project key: `--project`, then `default_project`.
    pub fn project(&self, config: &Config) -> Result<String> {
        match self.project.as_ref().or(config.server.default_project.as_ref()) {
            Some(project) => Ok(project.clone()),
            None => bail!(
                "No project specified. Use --project or run 'sq config set default_project <KEY>'."
            ),
        }
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage project branches and pull requests
    #[command(visible_alias = "br")]
    Branch(BranchCommand),

    /// Read measures
    #[command(visible_alias = "m")]
    Measure(MeasureCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}
