// handlers/protected/crops.rs - /api/crops CRUD, scoped to the caller

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{Crop, CropPatch, NewCrop};
use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RecordId, ValidJson};

/// GET /api/crops - All of the caller's crops, newest first
pub async fn list(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<Crop>> {
    let crops = state.crops().list(&user, Filter::new().order("createdAt desc")?).await?;
    Ok(ApiResponse::success(crops))
}

/// GET /api/crops/farm/:farmId - Crops on one of the caller's farms
pub async fn list_for_farm(
    State(state): State<AppState>,
    user: AuthUser,
    RecordId(farm_id): RecordId,
) -> ApiResult<Vec<Crop>> {
    state.farms().get(&user, farm_id).await?;
    let filter = Filter::new()
        .where_eq("farmId", farm_id.to_string())
        .order("createdAt desc")?;
    let crops = state.crops().list(&user, filter).await?;
    Ok(ApiResponse::success(crops))
}

/// POST /api/crops - The farm must exist and belong to the caller
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<NewCrop>,
) -> ApiResult<Crop> {
    let crop = state.crops().create(&user, input).await?;
    Ok(ApiResponse::created(crop))
}

/// GET /api/crops/:id
pub async fn get(State(state): State<AppState>, user: AuthUser, RecordId(id): RecordId) -> ApiResult<Crop> {
    let crop = state.crops().get(&user, id).await?;
    Ok(ApiResponse::success(crop))
}

/// PUT /api/crops/:id - Partial update
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    RecordId(id): RecordId,
    ValidJson(patch): ValidJson<CropPatch>,
) -> ApiResult<Crop> {
    let crop = state.crops().update(&user, id, patch).await?;
    Ok(ApiResponse::success(crop))
}

/// DELETE /api/crops/:id
pub async fn delete(State(state): State<AppState>, user: AuthUser, RecordId(id): RecordId) -> ApiResult<Value> {
    let crop = state.crops().delete(&user, id).await?;
    Ok(ApiResponse::success(json!({
        "id": crop.id,
        "message": "Crop deleted successfully"
    })))
}
