use axum::extract::State;
use serde_json::{json, Value};

use crate::api::format::{drinks_to_api_values, DrinkProjection};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

async fn drinks(state: &AppState, projection: DrinkProjection) -> ApiResult<Value> {
    let drinks = state
        .store
        .list_drinks()
        .await
        .map_err(ApiError::unprocessable_from)?;

    Ok(ApiResponse::success(json!({
        "drinks": drinks_to_api_values(&drinks, projection),
    })))
}

/// GET /drinks - public menu without recipes
pub async fn short(State(state): State<AppState>) -> ApiResult<Value> {
    drinks(&state, DrinkProjection::Short).await
}

/// GET /drinks-detail - requires `get:drinks-detail`
pub async fn detail(State(state): State<AppState>) -> ApiResult<Value> {
    drinks(&state, DrinkProjection::Long).await
}
