// handlers/protected/farms.rs - /api/farms CRUD, scoped to the caller

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{Farm, FarmPatch, NewFarm};
use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RecordId, ValidJson};
use crate::services::delete_farm;

/// GET /api/farms - The caller's farms, newest first
pub async fn list(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<Farm>> {
    let farms = state.farms().list(&user, Filter::new().order("createdAt desc")?).await?;
    Ok(ApiResponse::success(farms))
}

/// POST /api/farms
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<NewFarm>,
) -> ApiResult<Farm> {
    let farm = state.farms().create(&user, input).await?;
    Ok(ApiResponse::created(farm))
}

/// GET /api/farms/:id
pub async fn get(State(state): State<AppState>, user: AuthUser, RecordId(id): RecordId) -> ApiResult<Farm> {
    let farm = state.farms().get(&user, id).await?;
    Ok(ApiResponse::success(farm))
}

/// PUT /api/farms/:id - Partial update
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    RecordId(id): RecordId,
    ValidJson(patch): ValidJson<FarmPatch>,
) -> ApiResult<Farm> {
    let farm = state.farms().update(&user, id, patch).await?;
    Ok(ApiResponse::success(farm))
}

/// DELETE /api/farms/:id - Also removes the farm's activities and crops
pub async fn delete(State(state): State<AppState>, user: AuthUser, RecordId(id): RecordId) -> ApiResult<Value> {
    let removal = delete_farm(state.store.clone(), &user, id).await?;
    Ok(ApiResponse::success(json!({
        "id": removal.farm_id,
        "activitiesRemoved": removal.activities_removed,
        "cropsRemoved": removal.crops_removed,
        "message": "Farm deleted successfully"
    })))
}
