//! Summary matrix endpoints. Both operate on the full eligible set, never a
//! paginated slice.

use super::{ApiError, AppState};
use axum::Json;
use axum::extract::State;
use chrono::Local;
use reports::normalize::{normalize_engagement, normalize_test};
use reports::summary::{
    EngagementSummaryRow, EngagementSummaryTotals, JiraSummary, engagement_summary, jira_summary,
};
use serde::Serialize;
use tracker::Lookups;

#[derive(Serialize)]
pub struct EngagementSummaryResponse {
    pub success: bool,
    pub data: Vec<EngagementSummaryRow>,
    pub col_totals: EngagementSummaryTotals,
}

pub async fn engagements(
    State(state): State<AppState>,
) -> Result<Json<EngagementSummaryResponse>, ApiError> {
    let raws = state.tracker.engagements().await?;
    let lookups = Lookups {
        users: state.tracker.users_map().await,
        ..Default::default()
    };
    let today = Local::now().date_naive();

    let rows: Vec<_> = raws
        .iter()
        .filter_map(|raw| normalize_engagement(raw, &lookups, today).kept())
        .collect();
    let (data, col_totals) = engagement_summary(&rows);

    Ok(Json(EngagementSummaryResponse {
        success: true,
        data,
        col_totals,
    }))
}

#[derive(Serialize)]
pub struct JiraSummaryResponse {
    pub success: bool,
    #[serde(flatten)]
    pub summary: JiraSummary,
}

pub async fn jiras(State(state): State<AppState>) -> Result<Json<JiraSummaryResponse>, ApiError> {
    let raws = state.tracker.tests().await?;
    let lookups = Lookups {
        users: state.tracker.users_map().await,
        environments: state.tracker.environments_map().await,
        ..Default::default()
    };

    let rows: Vec<_> = raws
        .iter()
        .filter_map(|raw| normalize_test(raw, &lookups).kept())
        .collect();

    Ok(Json(JiraSummaryResponse {
        success: true,
        summary: jira_summary(&rows),
    }))
}
