//
//  sonar-web-api
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! Typed access to the SonarQube web services for branches and measures.
//!
//! ## Architecture
//!
//! - [`client`]: Core HTTP client with request handling and error reporting
//! - [`branches`]: Branch and pull request listing, deletion, renaming
//! - [`measures`]: Metric values, with or without metadata
//! - [`fixtures`]: Sample pull requests used in mock mode
//! - [`common`]: Shared types (errors, error sink, wire encodings)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sonar_web_api::api::{ClientOptions, SonarClient};
//! use sonar_web_api::api::measures::MeasuresRequest;
//!
//! # async fn example() -> Result<(), sonar_web_api::api::ApiError> {
//! let client = SonarClient::with_options("https://sonar.example.com", ClientOptions::default())?;
//!
//! let measures = client
//!     .get_measures(&MeasuresRequest::new("my-project", ["bugs", "coverage"]))
//!     .await?;
//! for measure in measures {
//!     println!("{} = {}", measure.metric, measure.value.as_deref().unwrap_or("-"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failed call is handed to the client's [`ErrorSink`] exactly once and
//! then returned as an [`ApiError`]:
//!
//! - `Unauthorized`: 401
//! - `Forbidden`: 403
//! - `NotFound`: 404
//! - `Server`: 5xx
//! - `Schema`: body did not match the expected shape

pub mod branches;
pub mod client;
pub mod common;
pub mod fixtures;
pub mod measures;

pub use branches::{BranchLike, DeleteBranchRequest};
pub use client::{ClientOptions, SonarClient};
pub use common::{ApiError, ErrorSink, LogErrorSink, RequestData};
pub use measures::{Measure, MeasuresAndMeta, MeasuresRequest, Metric, Period, ProjectMeasure};
