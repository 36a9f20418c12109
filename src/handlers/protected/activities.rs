// handlers/protected/activities.rs - /api/activities CRUD, scoped to the caller

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{Activity, ActivityPatch, NewActivity};
use crate::filter::Filter;
use crate::middleware::{parse_record_id, ApiResponse, ApiResult, AuthUser, RecordId, ValidJson};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    /// Restrict the listing to one farm.
    pub farm_id: Option<String>,
}

/// GET /api/activities[?farmId=] - Most recent activity date first
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Vec<Activity>> {
    let mut filter = Filter::new().order("date desc, createdAt desc")?;
    if let Some(raw) = query.farm_id.as_deref().filter(|s| !s.is_empty()) {
        filter = filter.where_eq("farmId", parse_record_id(raw)?.to_string());
    }
    let activities = state.activities().list(&user, filter).await?;
    Ok(ApiResponse::success(activities))
}

/// POST /api/activities - The referenced farm must exist and belong to the caller
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<NewActivity>,
) -> ApiResult<Activity> {
    let activity = state.activities().create(&user, input).await?;
    Ok(ApiResponse::created(activity))
}

/// GET /api/activities/:id
pub async fn get(State(state): State<AppState>, user: AuthUser, RecordId(id): RecordId) -> ApiResult<Activity> {
    let activity = state.activities().get(&user, id).await?;
    Ok(ApiResponse::success(activity))
}

/// PUT /api/activities/:id - Partial update; a new farmId is checked like on create
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    RecordId(id): RecordId,
    ValidJson(patch): ValidJson<ActivityPatch>,
) -> ApiResult<Activity> {
    let activity = state.activities().update(&user, id, patch).await?;
    Ok(ApiResponse::success(activity))
}

/// DELETE /api/activities/:id
pub async fn delete(State(state): State<AppState>, user: AuthUser, RecordId(id): RecordId) -> ApiResult<Value> {
    let activity = state.activities().delete(&user, id).await?;
    Ok(ApiResponse::success(json!({
        "id": activity.id,
        "message": "Activity deleted successfully"
    })))
}
