//! Engagement listing, filter options, and updates.

use super::{
    ApiError, AppState, ListResponse, PageParams, UpdateResponse, forward_optional, require_id,
    require_value,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Local;
use reports::filter::{EngagementFilter, matches_engagement};
use reports::normalize::{EngagementRow, normalize_engagement};
use reports::options::{EngagementFilterOptions, engagement_filter_options};
use reports::paginate::paginate;
use serde::Serialize;
use serde_json::{Map, Value};
use tracker::Lookups;

async fn engagement_lookups(state: &AppState) -> Lookups {
    Lookups {
        users: state.tracker.users_map().await,
        products: state.tracker.products_map().await,
        ..Default::default()
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filter): Query<EngagementFilter>,
) -> Result<Json<ListResponse<EngagementRow>>, ApiError> {
    let raws = state.tracker.engagements().await?;
    let lookups = engagement_lookups(&state).await;
    let today = Local::now().date_naive();

    let rows: Vec<EngagementRow> = raws
        .iter()
        .filter_map(|raw| normalize_engagement(raw, &lookups, today).kept())
        .filter(|row| matches_engagement(row, &filter))
        .collect();

    let result = paginate(rows, page.page(), page.limit());
    Ok(Json(ListResponse {
        success: true,
        data: result.items,
        total: result.total,
        page: page.page(),
        limit: page.limit(),
    }))
}

#[derive(Serialize)]
pub struct OptionsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub options: EngagementFilterOptions,
}

pub async fn filter_options(
    State(state): State<AppState>,
) -> Result<Json<OptionsResponse>, ApiError> {
    let raws = state.tracker.engagements().await?;
    let lookups = engagement_lookups(&state).await;

    Ok(Json(OptionsResponse {
        success: true,
        options: engagement_filter_options(&raws, &lookups),
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let Json(body) = body?;

    let mut payload = Map::new();
    payload.insert("name".into(), require_value(&body, "name")?);
    payload.insert("target_start".into(), require_value(&body, "target_start")?);
    payload.insert("target_end".into(), require_value(&body, "target_end")?);
    payload.insert("lead".into(), Value::from(require_id(&body, "lead")?));
    payload.insert("product".into(), Value::from(require_id(&body, "product")?));

    for key in ["status", "build_id", "commit_hash", "version"] {
        forward_optional(&mut payload, &body, key);
    }
    // Description may be legitimately cleared, so a present key is always
    // forwarded, including null.
    if let Some(description) = body.get("description") {
        payload.insert("description".into(), description.clone());
    }

    state
        .tracker
        .update_engagement(id, &Value::Object(payload))
        .await?;
    Ok(Json(UpdateResponse::updated()))
}
