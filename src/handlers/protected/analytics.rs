// handlers/protected/analytics.rs - GET /api/analytics/summary

use axum::extract::State;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{summary_for, AnalyticsSummary};

pub async fn summary(State(state): State<AppState>, user: AuthUser) -> ApiResult<AnalyticsSummary> {
    let summary = summary_for(state.store.clone(), &user).await?;
    Ok(ApiResponse::success(summary))
}
