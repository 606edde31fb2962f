//
//  sonar-web-api
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the SonarQube Web Services
//!
//! This module provides the shared pieces every operation module builds on:
//! the error type, the error sink abstraction, free-form request parameters,
//! and the date and list encodings the server uses on the wire.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`ErrorSink`] - Capability that receives every failed request exactly once
//! - [`LogErrorSink`] - Default sink that records failures through `tracing`
//! - [`RequestData`] - Extra query parameters supplied by callers
//! - [`sonar_date`] - Serde adapter for the server's timestamp format
//!
//! # Example
//!
//! ```rust
//! use sonar_web_api::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::Unauthorized(_)) => println!("Please provide valid credentials"),
//!         Err(ApiError::NotFound(resource)) => println!("Not found: {}", resource),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Serializer;
use thiserror::Error;

/// Unified error type for all SonarQube API operations.
///
/// Every variant is a flavour of "the request failed". Callers that only care
/// about success can treat it as a single kind; callers that want to react to
/// a specific HTTP status can match on the variant.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `Unauthorized` | Missing or rejected credentials | 401 |
/// | `Forbidden` | Insufficient permissions | 403 |
/// | `NotFound` | Project, branch or component does not exist | 404 |
/// | `BadRequest` | Invalid parameters | 400 |
/// | `Server` | Internal server error | 5xx |
/// | `Http` | Any other non-success status | other |
/// | `Network` | Transport failure | N/A |
/// | `Schema` | Body does not match the expected shape | N/A |
/// | `InvalidUrl` | Server URL could not be parsed | N/A |
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server rejected the request because credentials are missing or invalid.
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// The authenticated user lacks the permission the operation needs.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// The requested project, branch or component was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The server refused the parameters that were sent.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The server failed while handling the request (HTTP 5xx).
    #[error("Server error ({status}): {message}")]
    Server {
        /// The HTTP status returned by the server
        status: StatusCode,
        /// Message extracted from the error body
        message: String,
    },

    /// A non-success status that has no dedicated variant.
    #[error("API error ({status}): {message}")]
    Http {
        /// The HTTP status returned by the server
        status: StatusCode,
        /// Message extracted from the error body
        message: String,
    },

    /// Connection, TLS, timeout or body transfer failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not JSON of the expected shape.
    #[error("Unexpected response: {0}")]
    Schema(#[from] serde_json::Error),

    /// The configured server URL is not a valid absolute URL.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Builds the error for a non-success response.
    ///
    /// SonarQube reports failures as `{"errors": [{"msg": "..."}]}`. All
    /// messages found there are joined; otherwise the raw body is kept so
    /// that nothing the server said is lost.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_error_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        });

        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            s if s.is_server_error() => Self::Server { status, message },
            _ => Self::Http { status, message },
        }
    }

    /// Returns the HTTP status behind this error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
            Self::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Server { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status(),
            Self::Schema(_) | Self::InvalidUrl(_) => None,
        }
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;

    // {"errors": [{"msg": "..."}, ...]}
    let messages: Vec<&str> = json
        .get("errors")
        .and_then(|e| e.as_array())
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("msg").and_then(|m| m.as_str()))
                .collect()
        })
        .unwrap_or_default();
    if !messages.is_empty() {
        return Some(messages.join("; "));
    }

    json.get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

/// Receives every failed request made through a [`SonarClient`](crate::api::SonarClient).
///
/// The sink is configured once when the client is built. It is invoked exactly
/// once per failed call, before the error is handed back to the caller, so a
/// UI layer can surface failures uniformly without every call site doing so.
///
/// Any `Fn(&ApiError) + Send + Sync` closure is a sink:
///
/// ```rust
/// use sonar_web_api::api::SonarClient;
///
/// let client = SonarClient::new("https://sonar.example.com")?
///     .with_error_sink(|e: &sonar_web_api::api::ApiError| eprintln!("request failed: {e}"));
/// # Ok::<(), sonar_web_api::api::ApiError>(())
/// ```
pub trait ErrorSink: Send + Sync {
    /// Records a failed request.
    fn report(&self, error: &ApiError);
}

impl<F> ErrorSink for F
where
    F: Fn(&ApiError) + Send + Sync,
{
    fn report(&self, error: &ApiError) {
        self(error)
    }
}

/// Default sink: logs the failure and leaves presentation to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&self, error: &ApiError) {
        match error.status() {
            Some(status) if status.is_client_error() => {
                tracing::warn!(%status, "request rejected: {error}")
            }
            _ => tracing::error!("request failed: {error}"),
        }
    }
}

/// Caller-supplied query parameters merged into a request.
pub type RequestData = BTreeMap<String, String>;

/// Serializes a key list as the single comma-separated value the server expects.
pub(crate) fn join_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&keys.join(","))
}

/// Serde adapter for optional server timestamps.
///
/// The server writes dates as `2017-01-02T00:00:00+0100`, an ISO 8601 form
/// without the colon in the offset. RFC 3339 (`Z` or `+01:00`) is accepted
/// too, which is also the form used when serializing.
pub mod sonar_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Parses a server timestamp into UTC.
    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse(&s).ok_or_else(|| D::Error::custom(format!("invalid date '{s}'"))))
            .transpose()
    }
}
