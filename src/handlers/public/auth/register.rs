// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::RegisterRequest;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};

#[derive(Debug, Serialize)]
pub struct Registered {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: &'static str,
}

/**
 * POST /api/auth/register - Create a user account
 *
 * Input: `{ "name": "string", "email": "string", "password": "string" }`
 *
 * Returns 201 with the new user's id. 409 if the email is already registered,
 * 400 listing every missing or invalid field otherwise.
 */
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> ApiResult<Registered> {
    let user = state.auth.register(request).await?;

    Ok(ApiResponse::created(Registered {
        id: user.id,
        name: user.name,
        email: user.email,
        message: "User registered successfully",
    }))
}
