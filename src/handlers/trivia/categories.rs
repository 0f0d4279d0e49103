use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::api::format::{category_labels, questions_to_api_values};
use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::route_id;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /categories - every category label, ordered by id
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let categories = state.store.list_categories().await?;

    if categories.is_empty() {
        return Err(ApiError::not_found("no categories stored"));
    }

    Ok(ApiResponse::success(json!({
        "categories": category_labels(&categories),
    })))
}

/// GET /categories/:id/questions - questions of one category.
///
/// An unknown category is 422; a known category without questions is 404.
pub async fn questions(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let category_id = route_id(&id).ok_or_else(|| ApiError::not_found(format!("no route for category '{}'", id)))?;

    let category = match state.store.find_category(category_id).await {
        Ok(Some(category)) => category,
        Ok(None) => {
            return Err(ApiError::unprocessable(format!("category {} does not exist", category_id)));
        }
        Err(e) => return Err(ApiError::unprocessable_from(e)),
    };

    let questions = state
        .store
        .questions_in_category(category_id)
        .await
        .map_err(ApiError::unprocessable_from)?;

    if questions.is_empty() {
        return Err(ApiError::not_found(format!("category {} has no questions", category_id)));
    }

    Ok(ApiResponse::success(json!({
        "questions": questions_to_api_values(&questions),
        "total_questions": questions.len(),
        "current_category": category.kind,
    })))
}
