//! HTTP surface of the gateway.
//!
//! One JSON endpoint per capability. Every response is an envelope: HTTP 200
//! with `success: true` on the happy path, HTTP 500 with
//! `{"success": false, "error": ...}` for any failure. A failed primary
//! collection fetch aborts the request; failed reference fetches degrade to
//! empty lookup maps upstream in the tracker crate and the request proceeds.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracker::{Tracker, TrackerError};

mod engagements;
mod jira_counts;
mod summary;

#[derive(Clone)]
pub struct AppState {
    pub tracker: Tracker,
    /// Cap on the jira-counts id list; each id costs one upstream call.
    pub jira_counts_max_ids: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/engagements", get(engagements::list))
        .route("/api/filter-options", get(engagements::filter_options))
        .route("/api/engagement/{id}", put(engagements::update))
        .route("/api/tests", get(jira_tests::list))
        .route("/api/test-filter-options", get(jira_tests::filter_options))
        .route("/api/test/{id}", put(jira_tests::update))
        .route("/api/jira-counts", post(jira_counts::counts))
        .route("/api/summary/engagements", get(summary::engagements))
        .route("/api/summary/jiras", get(summary::jiras))
        .with_state(state)
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] TrackerError),

    #[error("invalid request body: {0}")]
    BadBody(#[from] JsonRejection),

    #[error("{0}")]
    InvalidUpdate(String),

    #[error("engagement_ids list exceeds the cap of {0}")]
    TooManyIds(usize),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Pagination query parameters. Absent or malformed values fall back to the
/// defaults instead of failing the request.
#[derive(Deserialize)]
pub struct PageParams {
    #[serde(default)]
    page: Option<String>,
    #[serde(default)]
    limit: Option<String>,
}

impl PageParams {
    pub fn page(&self) -> usize {
        parse_or(&self.page, 1)
    }

    pub fn limit(&self) -> usize {
        parse_or(&self.limit, 10)
    }
}

fn parse_or(value: &Option<String>, default: usize) -> usize {
    value
        .as_deref()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

#[derive(Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
}

impl UpdateResponse {
    fn updated() -> Self {
        UpdateResponse {
            success: true,
            message: "Updated successfully".to_string(),
        }
    }
}

/// A required update field: present and non-null, forwarded as-is.
fn require_value(body: &Value, key: &str) -> Result<Value, ApiError> {
    match body.get(key) {
        Some(value) if !value.is_null() => Ok(value.clone()),
        _ => Err(ApiError::InvalidUpdate(format!(
            "missing required field '{key}'"
        ))),
    }
}

/// A required id field: must be integer-coercible, tolerating a numeric
/// string from the form layer.
fn require_id(body: &Value, key: &str) -> Result<i64, ApiError> {
    let not_coercible =
        || ApiError::InvalidUpdate(format!("field '{key}' must be an integer id"));
    match body.get(key) {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(not_coercible),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| not_coercible()),
        _ => Err(not_coercible()),
    }
}

/// Forward an optional field only when it carries a usable value (skips
/// null and empty strings).
fn forward_optional(payload: &mut Map<String, Value>, body: &Value, key: &str) {
    if let Some(value) = body.get(key) {
        let keep = match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        };
        if keep {
            payload.insert(key.to_string(), value.clone());
        }
    }
}
