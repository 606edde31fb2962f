//
//  sonar-web-api
//  cli/completion.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shell completion commands

use std::io::Write;

use anyhow::Result;
use clap::{Args, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use super::Cli;
use crate::APP_NAME;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionCommand {
    #[command(subcommand)]
    pub command: CompletionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CompletionSubcommand {
    /// Generate Bash completions
    Bash,

    /// Generate Zsh completions
    Zsh,

    /// Generate Fish completions
    Fish,

    /// Generate PowerShell completions
    Powershell,
}

impl CompletionSubcommand {
    fn shell(&self) -> Shell {
        match self {
            CompletionSubcommand::Bash => Shell::Bash,
            CompletionSubcommand::Zsh => Shell::Zsh,
            CompletionSubcommand::Fish => Shell::Fish,
            CompletionSubcommand::Powershell => Shell::PowerShell,
        }
    }
}

impl CompletionCommand {
    pub fn run(&self) -> Result<()> {
        self.write_to(&mut std::io::stdout())
    }

    fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        let mut cmd = Cli::command();
        generate(self.command.shell(), &mut cmd, APP_NAME, out);
        Ok(())
    }
}
