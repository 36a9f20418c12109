// handlers/public/advisories.rs - Advisory reads open to anonymous callers

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::{Advisory, AdvisoryCategory};
use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RecordId};

fn global_advisories() -> Result<Filter, ApiError> {
    Filter::new()
        .where_eq("isGlobal", true)
        .order("createdAt desc")
        .map_err(ApiError::from)
}

/// GET /api/advisories - Global advisories, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Advisory>> {
    let advisories = Repository::<Advisory>::new(state.store.clone())
        .find_many(&global_advisories()?)
        .await?;
    Ok(ApiResponse::success(advisories))
}

/// GET /api/advisories/category/:category - Global advisories in one category
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Vec<Advisory>> {
    let category: AdvisoryCategory = category.parse()?;
    let filter = global_advisories()?.where_eq("category", category.as_str());
    let advisories = Repository::<Advisory>::new(state.store.clone())
        .find_many(&filter)
        .await?;
    Ok(ApiResponse::success(advisories))
}

/// GET /api/advisories/:id - Global advisories are public; private ones only reach their creator
pub async fn get(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    RecordId(id): RecordId,
) -> ApiResult<Advisory> {
    let advisory = Repository::<Advisory>::new(state.store.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Advisory not found"))?;

    if !advisory.is_global {
        match user {
            None => return Err(ApiError::unauthorized("Not authorized, no token")),
            Some(user) if user.user_id != advisory.created_by => {
                return Err(ApiError::forbidden("Not authorized to access this advisory"))
            }
            Some(_) => {}
        }
    }
    Ok(ApiResponse::success(advisory))
}
