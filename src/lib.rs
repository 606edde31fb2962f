//
//  sonar-web-api
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # SonarQube Web API Library
//!
//! A typed client for the SonarQube branch and measure web services, plus the
//! `sq` command-line tool built on top of it.
//!
//! ## Overview
//!
//! Each operation is a thin async wrapper over one web service endpoint:
//! it builds the request, decodes the response into typed structs, and
//! reports any failure to an injected [`api::ErrorSink`] exactly once before
//! returning it to the caller.
//!
//! ## Features
//!
//! - **Branches**: list branches and pull requests, delete one, rename the main branch
//! - **Measures**: read measures of a component, with metric and period metadata, or across projects
//! - **Schema validation**: responses that do not match the expected shape fail with a typed error
//! - **Mock mode**: append sample pull requests to branch listings for demos
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: HTTP client, typed entities and web service operations
//! - [`config`]: Configuration file management
//! - [`output`]: Output formatting (Table, JSON)
//! - [`util`]: Utility functions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sonar_web_api::api::{MeasuresRequest, SonarClient};
//!
//! # async fn demo() -> Result<(), sonar_web_api::api::ApiError> {
//! let client = SonarClient::new("https://sonar.example.com")?
//!     .with_error_sink(|e: &sonar_web_api::api::ApiError| eprintln!("{}", e));
//!
//! let branches = client.get_branches("my-project").await?;
//! for branch in &branches {
//!     println!("{}", branch.display_name());
//! }
//!
//! let request = MeasuresRequest::new("my-project", ["bugs", "coverage"]);
//! let measures = client.get_measures(&request).await?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// Web service client and the branch and measure operations.
///
/// All operations share one [`api::SonarClient`], which owns the HTTP
/// connection pool, the server base URL, the mock mode flag and the error sink.
pub mod api;

/// Configuration file management.
///
/// Manages the CLI's configuration stored in platform-specific locations:
/// - Linux: `~/.config/sq/config.toml`
/// - macOS: `~/Library/Application Support/sq/config.toml`
/// - Windows: `%APPDATA%\sq\config.toml`
pub mod config;

/// Output formatting for tables and JSON.
pub mod output;

/// Utility functions and helpers.
pub mod util;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use sonar_web_api::Cli;
///
/// let cli = Cli::parse();
/// ```
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Re-export of the web service client.
pub use api::SonarClient;

/// The name of the CLI binary.
pub const APP_NAME: &str = "sq";

/// Application version constant.
///
/// ```rust
/// use sonar_web_api::VERSION;
///
/// println!("sq version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// - `0`: Success
/// - `1`: General errors (`2` is clap's usage error)
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// The server rejected the credentials or the permission is missing.
    pub const AUTH_ERROR: i32 = 4;

    /// The project, branch or component does not exist.
    pub const NOT_FOUND: i32 = 8;
}
