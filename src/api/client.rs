//
//  sonar-web-api
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the SonarQube Web API
//!
//! This module provides the core HTTP client that every operation module
//! delegates to. It owns the transport, the server URL, the client options and
//! the error sink.
//!
//! ## Features
//!
//! - JSON `GET` with query parameters, decoded into typed values
//! - Form-encoded `POST` for write operations
//! - Status code mapping into [`ApiError`]
//! - Single reporting point for failures through the configured [`ErrorSink`]
//! - Custom User-Agent header

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::common::{ApiError, ErrorSink, LogErrorSink};
use crate::config::ServerConfig;

/// Options that shape how a [`SonarClient`] behaves.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use sonar_web_api::api::ClientOptions;
///
/// let options = ClientOptions {
///     mock_mode: true,
///     timeout: Some(Duration::from_secs(10)),
/// };
/// assert!(options.mock_mode);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientOptions {
    /// Append the sample pull requests to branch listings.
    ///
    /// Only meant for demos and UI work against a server that has no pull
    /// request analyses yet. Never enable it against real data you act on.
    pub mock_mode: bool,

    /// Per-request timeout. `None` keeps the transport default (no timeout).
    pub timeout: Option<Duration>,
}

/// The HTTP client for the SonarQube web services.
///
/// Operations live in [`branches`](super::branches) and
/// [`measures`](super::measures) as methods on this type. Each of them issues
/// exactly one request through [`get_json`](Self::get_json) or
/// [`post`](Self::post).
///
/// # Creating a Client
///
/// ```rust,no_run
/// use sonar_web_api::api::SonarClient;
///
/// let client = SonarClient::new("https://sonar.example.com")?;
/// # Ok::<(), sonar_web_api::api::ApiError>(())
/// ```
#[derive(Clone)]
pub struct SonarClient {
    /// The underlying HTTP client
    http: Client,
    /// Server root, e.g. `https://sonar.example.com` or `https://host/sonar`
    base_url: Url,
    options: ClientOptions,
    error_sink: Arc<dyn ErrorSink>,
}

impl fmt::Debug for SonarClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SonarClient")
            .field("base_url", &self.base_url.as_str())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SonarClient {
    /// Creates a client for the server at `base_url` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not an absolute URL,
    /// or [`ApiError::Network`] if the HTTP client could not be built.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Creates a client for the server at `base_url` with explicit options.
    pub fn with_options(base_url: &str, options: ClientOptions) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;

        let mut builder = Client::builder().user_agent(format!("sq/{}", crate::VERSION));
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            options,
            error_sink: Arc::new(LogErrorSink),
        })
    }

    /// Creates a client from the `[server]` section of the configuration file.
    ///
    /// # Errors
    ///
    /// Fails if no server URL is configured or the URL is invalid.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let url = config.url.as_deref().ok_or_else(|| {
            anyhow::anyhow!("No server configured. Run 'sq config set url <URL>' or pass --server.")
        })?;

        Ok(Self::with_options(url, config.client_options())?)
    }

    /// Replaces the sink that receives failed requests.
    ///
    /// This method uses the builder pattern and returns `self` for chaining.
    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.error_sink = Arc::new(sink);
        self
    }

    /// Toggles mock mode after construction.
    pub fn with_mock_mode(mut self, enabled: bool) -> Self {
        self.options.mock_mode = enabled;
        self
    }

    /// Returns `true` if branch listings are padded with sample pull requests.
    pub fn is_mock_mode(&self) -> bool {
        self.options.mock_mode
    }

    /// Returns the server root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the absolute URL of an API path.
    ///
    /// The path is appended to the base URL rather than resolved against it,
    /// so servers mounted under a context path (`https://host/sonar`) keep it.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?)
    }

    /// Makes a `GET` request and decodes the JSON body into `T`.
    ///
    /// `query` is anything that serializes to URL-encoded pairs: a slice of
    /// tuples, a map, or a struct.
    ///
    /// # Errors
    ///
    /// Returns an error if the network request fails, the status is not 2xx,
    /// or the body does not decode into `T`. The error sink sees the error
    /// before it is returned.
    pub async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let result = self.fetch_json(path, query).await;
        self.report(result)
    }

    /// Makes a `POST` request with a form-encoded body.
    ///
    /// Write endpoints answer with an empty body (usually `204 No Content`),
    /// so nothing is decoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the network request fails or the status is not
    /// 2xx. The error sink sees the error before it is returned.
    pub async fn post<B>(&self, path: &str, form: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let result = self.send_form(path, form).await;
        self.report(result)
    }

    async fn fetch_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(method = "GET", %url, "sending request");

        let response = self.http.get(url).query(query).send().await?;
        let body = check_status(response).await?.text().await?;

        Ok(serde_json::from_str(&body)?)
    }

    async fn send_form<B>(&self, path: &str, form: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(method = "POST", %url, "sending request");

        let response = self.http.post(url).form(form).send().await?;
        check_status(response).await?;

        Ok(())
    }

    fn report<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        result.inspect_err(|e| self.error_sink.report(e))
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(ApiError::from_response(status, &text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mockito::Matcher;

    #[test]
    fn test_endpoint_keeps_context_path() {
        let client = SonarClient::new("https://example.com/sonar/").unwrap();
        let url = client.endpoint("/api/measures/search").unwrap();
        assert_eq!(url.as_str(), "https://example.com/sonar/api/measures/search");
    }

    #[test]
    fn test_rejects_relative_url() {
        let err = SonarClient::new("sonar.example.com").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_mock_mode_defaults_off() {
        let client = SonarClient::new("https://example.com").unwrap();
        assert!(!client.is_mock_mode());
        assert!(client.with_mock_mode(true).is_mock_mode());
    }

    #[tokio::test]
    async fn test_post_sends_form_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/project_branches/rename")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("project".into(), "demo".into()),
                Matcher::UrlEncoded("name".into(), "main".into()),
            ]))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let client = SonarClient::new(&server.url()).unwrap();
        client
            .post("/api/project_branches/rename", &[("project", "demo"), ("name", "main")])
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/anything")
            .match_query(Matcher::UrlEncoded("a".into(), "b".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create_async()
            .await;

        let reported = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reported);
        let client = SonarClient::new(&server.url())
            .unwrap()
            .with_error_sink(move |_: &ApiError| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let result: Result<serde_json::Value, _> =
            client.get_json("/api/anything", &[("a", "b")]).await;

        assert!(matches!(result, Err(ApiError::Schema(_))));
        assert_eq!(reported.load(Ordering::SeqCst), 1);
    }
}
