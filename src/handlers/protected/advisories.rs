// handlers/protected/advisories.rs - Advisory writes and the caller's own advisories

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{Advisory, AdvisoryPatch, NewAdvisory};
use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RecordId, ValidJson};

/// GET /api/advisories/mine - Everything the caller created, global or not
pub async fn mine(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<Advisory>> {
    let advisories = state
        .advisories()
        .list(&user, Filter::new().order("createdAt desc")?)
        .await?;
    Ok(ApiResponse::success(advisories))
}

/// POST /api/advisories - severity defaults to medium, isGlobal to true
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<NewAdvisory>,
) -> ApiResult<Advisory> {
    let advisory = state.advisories().create(&user, input).await?;
    Ok(ApiResponse::created(advisory))
}

/// PUT /api/advisories/:id - Creator only
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    RecordId(id): RecordId,
    ValidJson(patch): ValidJson<AdvisoryPatch>,
) -> ApiResult<Advisory> {
    let advisory = state.advisories().update(&user, id, patch).await?;
    Ok(ApiResponse::success(advisory))
}

/// DELETE /api/advisories/:id - Creator only
pub async fn delete(State(state): State<AppState>, user: AuthUser, RecordId(id): RecordId) -> ApiResult<Value> {
    let advisory = state.advisories().delete(&user, id).await?;
    Ok(ApiResponse::success(json!({
        "id": advisory.id,
        "message": "Advisory deleted successfully"
    })))
}
