// handlers/protected/auth/profile.rs - The caller's own user record

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{ChangePasswordRequest, ProfilePatch, UserProfile};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidJson};

/// GET /api/auth/profile - Profile without credentials; farmName falls back to the oldest farm
pub async fn profile_get(State(state): State<AppState>, user: AuthUser) -> ApiResult<UserProfile> {
    let profile = state.auth.profile(user.user_id).await?;
    Ok(ApiResponse::success(profile))
}

/// PUT /api/auth/profile - Partial update of name, phone, location and farmName
pub async fn profile_put(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(patch): ValidJson<ProfilePatch>,
) -> ApiResult<UserProfile> {
    let profile = state.auth.update_profile(user.user_id, patch).await?;
    Ok(ApiResponse::success(profile))
}

/// PUT /api/auth/change-password - Requires the current password
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(request): ValidJson<ChangePasswordRequest>,
) -> ApiResult<Value> {
    state.auth.change_password(user.user_id, request).await?;
    Ok(ApiResponse::success(json!({
        "message": "Password updated successfully"
    })))
}
