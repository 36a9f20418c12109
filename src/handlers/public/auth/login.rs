// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::extract::State;

use crate::app::AppState;
use crate::auth::LoginSession;
use crate::database::models::LoginRequest;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};

/**
 * POST /api/auth/login - Exchange email and password for a bearer token
 *
 * Input: `{ "email": "string", "password": "string" }`
 *
 * Output: `{ "token": "...", "expiresIn": 86400, "user": { "id", "name", "email" } }`
 *
 * An unknown email and a wrong password produce the same 401 "Invalid credentials".
 */
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> ApiResult<LoginSession> {
    let session = state.auth.login(request).await?;
    Ok(ApiResponse::success(session))
}
