//
//  sonar-web-api
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sonar_web_api::api::ApiError;
use sonar_web_api::cli::{Cli, Commands};
use sonar_web_api::exit_codes;
use sonar_web_api::output::OutputWriter;

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            OutputWriter::from_flag(false).write_error(&format!("{e:#}"));
            std::process::exit(exit_code(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("SQ_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized(_)) | Some(ApiError::Forbidden(_)) => exit_codes::AUTH_ERROR,
        Some(ApiError::NotFound(_)) => exit_codes::NOT_FOUND,
        _ => exit_codes::ERROR,
    }
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Branch(cmd) => cmd.run(&cli.global).await,
        Commands::Measure(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(),
        Commands::Version => {
            println!("sq version {}", sonar_web_api::VERSION);
            Ok(())
        }
    }
}
