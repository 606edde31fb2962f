//
//  sonar-web-api
//  config/server.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Server Configuration Module
//!
//! The `[server]` section of the configuration file and the helpers that
//! keep server URLs in one canonical form.
//!
//! ## Usage
//!
//! ```rust
//! use sonar_web_api::config::normalize_server_url;
//!
//! assert_eq!(normalize_server_url(" sonar.example.com/ "), "https://sonar.example.com");
//! assert_eq!(normalize_server_url("http://localhost:9000"), "http://localhost:9000");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::ClientOptions;

/// Settings for the SonarQube server the CLI talks to.
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `url` | `None` |
/// | `mock_mode` | `false` |
/// | `timeout_secs` | `None` (no timeout) |
/// | `default_project` | `None` |
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServerConfig {
    /// Server root URL, e.g. `https://sonar.example.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Append sample pull requests to branch listings.
    #[serde(default)]
    pub mock_mode: bool,

    /// Per-request timeout in seconds. `0` means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Project key used when a command gets no `--project`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
}

impl ServerConfig {
    /// Converts the settings into options for [`SonarClient`](crate::api::SonarClient).
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            mock_mode: self.mock_mode,
            timeout: self
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

/// Normalizes a server URL for storage and use.
///
/// Surrounding whitespace and trailing slashes are removed and `https://` is
/// assumed when no scheme is given.
pub fn normalize_server_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("https://") || url.starts_with("http://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
