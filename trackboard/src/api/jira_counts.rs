//! Batch jira tally endpoint. One upstream call per requested engagement id,
//! so the accepted list size is capped by configuration.

use super::{ApiError, AppState};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use reports::jira_counts::{JiraCounts, jira_counts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Deserialize)]
pub struct JiraCountsRequest {
    #[serde(default)]
    pub engagement_ids: Vec<i64>,
}

#[derive(Serialize)]
pub struct JiraCountsResponse {
    pub success: bool,
    /// Keyed by the engagement id rendered as a string.
    pub counts: BTreeMap<String, JiraCounts>,
}

pub async fn counts(
    State(state): State<AppState>,
    body: Result<Json<JiraCountsRequest>, JsonRejection>,
) -> Result<Json<JiraCountsResponse>, ApiError> {
    let Json(request) = body?;

    if request.engagement_ids.len() > state.jira_counts_max_ids {
        return Err(ApiError::TooManyIds(state.jira_counts_max_ids));
    }

    let mut counts_by_id = BTreeMap::new();
    for id in request.engagement_ids {
        // A failing id degrades to zero counts instead of aborting the batch.
        let tally = match state.tracker.tests_for_engagement(id).await {
            Ok(tests) => jira_counts(&tests),
            Err(error) => {
                tracing::warn!(engagement_id = id, error = %error, "jira counts fetch failed");
                JiraCounts::default()
            }
        };
        counts_by_id.insert(id.to_string(), tally);
    }

    Ok(Json(JiraCountsResponse {
        success: true,
        counts: counts_by_id,
    }))
}
