//
//  sonar-web-api
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loading, saving and accessing the CLI settings stored as TOML in a
//! platform-specific directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/sq/config.toml`
//! - **macOS**: `~/Library/Application Support/sq/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\sq\config.toml`
//!
//! The `SQ_CONFIG` environment variable overrides the location.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [server]
//! url = "https://sonar.example.com"
//! mock_mode = false
//! timeout_secs = 30
//! default_project = "my-project"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sonar_web_api::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("url", "sonar.example.com")?;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod server;

pub use server::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable that points at an alternative configuration file.
pub const CONFIG_ENV: &str = "SQ_CONFIG";

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &["url", "mock_mode", "timeout_secs", "default_project"];

/// Global configuration container for the CLI.
///
/// # Examples
///
/// ```rust
/// use sonar_web_api::config::Config;
///
/// let config = Config::default();
/// assert!(!config.server.mock_mode);
/// assert!(config.server.url.is_none());
/// ```
///
/// # Notes
///
/// - All fields use `#[serde(default)]` so partial files load fine
/// - The file is created on first save
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Server connection settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing file is not an error; defaults are returned.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or is not valid TOML.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// `SQ_CONFIG` wins when set; otherwise the platform config directory is
    /// resolved with the `directories` crate. The file may not exist.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "sq")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Gets a configuration value by key.
    ///
    /// Returns `None` for unknown keys and unset optional values.
    ///
    /// ```rust
    /// use sonar_web_api::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.get("mock_mode"), Some("false".to_string()));
    /// assert_eq!(config.get("url"), None);
    /// assert_eq!(config.get("unknown_key"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "url" => self.server.url.clone(),
            "mock_mode" => Some(self.server.mock_mode.to_string()),
            "timeout_secs" => self.server.timeout_secs.map(|t| t.to_string()),
            "default_project" => self.server.default_project.clone(),
            _ => None,
        }
    }

    /// Sets a configuration value by key.
    ///
    /// Returns `Ok(false)` for unknown keys. Server URLs are normalized with
    /// [`normalize_server_url`]. Changes are only persisted by [`Config::save`].
    ///
    /// # Errors
    ///
    /// Fails if the value cannot be parsed for the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        match key {
            "url" => self.server.url = Some(normalize_server_url(value)),
            "mock_mode" => {
                self.server.mock_mode = value
                    .parse()
                    .with_context(|| format!("Invalid value for mock_mode: '{}' (use true or false)", value))?
            }
            "timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid value for timeout_secs: '{}'", value))?;
                // 0 disables the timeout
                self.server.timeout_secs = Some(secs).filter(|s| *s > 0);
            }
            "default_project" => self.server.default_project = Some(value.to_string()),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Resets a key to its default. Returns `false` for unknown keys.
    pub fn unset(&mut self, key: &str) -> bool {
        match key {
            "url" => self.server.url = None,
            "mock_mode" => self.server.mock_mode = false,
            "timeout_secs" => self.server.timeout_secs = None,
            "default_project" => self.server.default_project = None,
            _ => return false,
        }
        true
    }
}
