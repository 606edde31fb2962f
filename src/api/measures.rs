//
//  sonar-web-api
//  api/measures.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Measures API
//!
//! Read-only access to metric values of a component, optionally with the
//! metric definitions and comparison periods that give them context, and
//! batched lookups across several projects.
//!
//! ## API Endpoints
//!
//! ```text
//! GET /api/measures/component  componentKey, metricKeys, branch?, pullRequest?, ...
//! GET /api/measures/search     projectKeys, metricKeys
//! ```
//!
//! Key lists are sent as a single comma-separated value.

use std::borrow::Borrow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::branches::BranchLike;
use super::client::SonarClient;
use super::common::{join_keys, sonar_date, ApiError, RequestData};

const COMPONENT_PATH: &str = "/api/measures/component";
const SEARCH_PATH: &str = "/api/measures/search";

/// A metric value of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    /// Metric key, e.g. `bugs` or `coverage`.
    pub metric: String,

    /// Absent when the metric has no value for the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Values relative to each comparison period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<MeasurePeriod>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_value: Option<bool>,
}

impl Measure {
    /// Returns the value of this measure for the period at `index`.
    pub fn period_value(&self, index: u32) -> Option<&str> {
        self.periods
            .as_deref()?
            .iter()
            .find(|p| p.index == index)
            .map(|p| p.value.as_str())
    }
}

/// A measure value relative to one comparison period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurePeriod {
    pub index: u32,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_value: Option<bool>,
}

/// Definition of a measurable quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub key: String,
    pub name: String,

    /// Value type: `INT`, `FLOAT`, `PERCENT`, `RATING`, `WORK_DUR`, ...
    #[serde(rename = "type")]
    pub metric_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `1` when higher is better, `-1` when lower is better, `0` when neutral.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualitative: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_scale: Option<u32>,
}

/// A comparison baseline, e.g. "since previous version".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub index: u32,

    /// `previous_version`, `days`, `date`, `version`, ...
    pub mode: String,

    #[serde(default, with = "sonar_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

/// The component a measures request was made for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureComponent {
    pub key: String,
    pub name: String,

    /// `TRK` for projects, `DIR` for directories, `FIL` for files, ...
    pub qualifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub measures: Vec<Measure>,
}

/// Full response of a measures request made with additional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuresAndMeta {
    pub component: MeasureComponent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<Metric>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<Period>>,
}

/// One metric value of one project, from a batched search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeasure {
    /// Project key.
    pub component: String,
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<MeasurePeriod>>,
}

/// Query of [`SonarClient::get_measures`].
///
/// ```rust
/// use sonar_web_api::api::measures::MeasuresRequest;
///
/// let request = MeasuresRequest::new("my-project", ["bugs", "coverage"]).branch("release-1.0");
/// assert_eq!(request.metric_keys, ["bugs", "coverage"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuresRequest {
    pub component_key: String,

    #[serde(serialize_with = "join_keys")]
    pub metric_keys: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<String>,
}

impl MeasuresRequest {
    pub fn new<I, S>(component_key: impl Into<String>, metric_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            component_key: component_key.into(),
            metric_keys: metric_keys.into_iter().map(Into::into).collect(),
            branch: None,
            pull_request: None,
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn pull_request(mut self, pull_request: impl Into<String>) -> Self {
        self.pull_request = Some(pull_request.into());
        self
    }

    /// Scopes the request to a branch or pull request from a listing.
    pub fn scoped_to(mut self, branch_like: &BranchLike) -> Self {
        let params = branch_like.query();
        self.branch = params.branch;
        self.pull_request = params.pull_request;
        self
    }
}

#[derive(Deserialize)]
struct ComponentMeasuresResponse {
    component: ComponentMeasures,
}

#[derive(Deserialize)]
struct ComponentMeasures {
    #[serde(default)]
    measures: Vec<Measure>,
}

#[derive(Deserialize)]
struct ProjectMeasuresResponse {
    measures: Vec<ProjectMeasure>,
}

impl SonarClient {
    /// Fetches current values of the requested metrics for one component.
    ///
    /// Only the measures array is returned; the component descriptor around
    /// it is dropped.
    pub async fn get_measures(&self, request: &MeasuresRequest) -> Result<Vec<Measure>, ApiError> {
        let response: ComponentMeasuresResponse = self.get_json(COMPONENT_PATH, request).await?;
        Ok(response.component.measures)
    }

    /// Fetches measures together with the component, metric definitions and periods.
    ///
    /// `additional` carries extra parameters such as
    /// `additionalFields=metrics,periods` or `branch`. `componentKey` and
    /// `metricKeys` always win over entries of the same name in it. The
    /// response envelope is returned as the server sent it.
    pub async fn get_measures_and_meta<S>(
        &self,
        component_key: &str,
        metrics: &[S],
        additional: RequestData,
    ) -> Result<MeasuresAndMeta, ApiError>
    where
        S: Borrow<str>,
    {
        let mut data = additional;
        data.insert("componentKey".to_string(), component_key.to_string());
        data.insert("metricKeys".to_string(), metrics.join(","));

        self.get_json(COMPONENT_PATH, &data).await
    }

    /// Fetches the given metrics for several projects in one call.
    pub async fn get_measures_for_projects<P, M>(
        &self,
        project_keys: &[P],
        metric_keys: &[M],
    ) -> Result<Vec<ProjectMeasure>, ApiError>
    where
        P: Borrow<str>,
        M: Borrow<str>,
    {
        let query = [
            ("projectKeys", project_keys.join(",")),
            ("metricKeys", metric_keys.join(",")),
        ];
        let response: ProjectMeasuresResponse = self.get_json(SEARCH_PATH, &query).await?;
        Ok(response.measures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use mockito::Matcher;
    use serde_json::json;

    fn component_body() -> serde_json::Value {
        json!({
            "component": {
                "key": "demo",
                "name": "Demo Project",
                "qualifier": "TRK",
                "measures": [
                    { "metric": "bugs", "value": "12", "periods": [{ "index": 1, "value": "3" }] },
                    { "metric": "coverage", "value": "81.4" },
                    { "metric": "new_bugs", "periods": [{ "index": 1, "value": "0", "bestValue": true }] }
                ]
            },
            "metrics": [
                { "key": "bugs", "name": "Bugs", "type": "INT", "domain": "Reliability", "direction": -1 },
                { "key": "coverage", "name": "Coverage", "type": "PERCENT", "decimalScale": 1 }
            ],
            "periods": [
                { "index": 1, "mode": "previous_version", "date": "2018-02-20T12:15:54+0100", "parameter": "6.7" }
            ]
        })
    }

    #[tokio::test]
    async fn test_get_measures_returns_measures_only() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", COMPONENT_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("componentKey".into(), "demo".into()),
                Matcher::UrlEncoded("metricKeys".into(), "bugs,coverage,new_bugs".into()),
                Matcher::UrlEncoded("branch".into(), "release-1.0".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(component_body().to_string())
            .expect(1)
            .create_async()
            .await;

        let client = SonarClient::new(&server.url()).unwrap();
        let request =
            MeasuresRequest::new("demo", ["bugs", "coverage", "new_bugs"]).branch("release-1.0");
        let measures = client.get_measures(&request).await.unwrap();

        mock.assert_async().await;

        let expected: Vec<Measure> =
            serde_json::from_value(component_body()["component"]["measures"].clone()).unwrap();
        assert_eq!(measures, expected);
        assert_eq!(measures[0].period_value(1), Some("3"));
        assert_eq!(measures[2].value, None);
    }

    #[tokio::test]
    async fn test_get_measures_for_pull_request_scope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", COMPONENT_PATH)
            .match_query(Matcher::UrlEncoded("pullRequest".into(), "2734".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"component":{"key":"demo","name":"Demo","qualifier":"TRK","measures":[]}}"#)
            .expect(1)
            .create_async()
            .await;

        let pr = BranchLike::PullRequest(crate::api::fixtures::sample_pull_requests().remove(0));
        let client = SonarClient::new(&server.url()).unwrap();
        let measures = client
            .get_measures(&MeasuresRequest::new("demo", ["bugs"]).scoped_to(&pr))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(measures.is_empty());
    }

    #[tokio::test]
    async fn test_get_measures_and_meta_returns_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", COMPONENT_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("componentKey".into(), "demo".into()),
                Matcher::UrlEncoded("metricKeys".into(), "bugs,coverage".into()),
                Matcher::UrlEncoded("additionalFields".into(), "metrics,periods".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(component_body().to_string())
            .expect(1)
            .create_async()
            .await;

        let mut additional = RequestData::new();
        additional.insert("additionalFields".into(), "metrics,periods".into());
        // Overridden by the explicit component key.
        additional.insert("componentKey".into(), "ignored".into());

        let client = SonarClient::new(&server.url()).unwrap();
        let envelope = client
            .get_measures_and_meta("demo", &["bugs", "coverage"], additional)
            .await
            .unwrap();

        mock.assert_async().await;

        let expected: MeasuresAndMeta = serde_json::from_value(component_body()).unwrap();
        assert_eq!(envelope, expected);
        assert_eq!(envelope.component.qualifier, "TRK");
        assert_eq!(envelope.metrics.as_ref().map(Vec::len), Some(2));

        let period = &envelope.periods.as_ref().unwrap()[0];
        assert_eq!(period.mode, "previous_version");
        assert_eq!(period.parameter.as_deref(), Some("6.7"));
        assert!(period.date.is_some());
    }

    #[tokio::test]
    async fn test_get_measures_for_projects_joins_keys() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("projectKeys".into(), "alpha,beta".into()),
                Matcher::UrlEncoded("metricKeys".into(), "alert_status,bugs".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "measures": [
                        { "component": "alpha", "metric": "alert_status", "value": "OK" },
                        { "component": "beta", "metric": "bugs", "value": "4" }
                    ]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = SonarClient::new(&server.url()).unwrap();
        let projects = vec!["alpha".to_string(), "beta".to_string()];
        let measures = client
            .get_measures_for_projects(&projects, &["alert_status", "bugs"])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(measures.len(), 2);
        assert_eq!(measures[0].component, "alpha");
        assert_eq!(measures[1].value.as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn test_measures_failures_reported_once_per_call() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", COMPONENT_PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let reported = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reported);
        let client = SonarClient::new(&server.url())
            .unwrap()
            .with_error_sink(move |_: &ApiError| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        assert!(client
            .get_measures(&MeasuresRequest::new("demo", ["bugs"]))
            .await
            .is_err());
        assert_eq!(reported.load(Ordering::SeqCst), 1);

        assert!(client
            .get_measures_and_meta("demo", &["bugs"], RequestData::new())
            .await
            .is_err());
        assert_eq!(reported.load(Ordering::SeqCst), 2);

        let err = client
            .get_measures_for_projects(&["demo"], &["bugs"])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(reported.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_measures_request_serializes_joined_keys() {
        let request = MeasuresRequest::new("demo", ["bugs", "coverage"]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({ "componentKey": "demo", "metricKeys": "bugs,coverage" }));
    }
}
