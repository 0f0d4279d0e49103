use axum::extract::{Path, Query, State};
use serde_json::{json, Value};

use crate::api::format::{category_labels, questions_to_api_values};
use crate::api::{paginate, JsonBody, PageQuery};
use crate::app::AppState;
use crate::database::models::NewQuestion;
use crate::error::ApiError;
use crate::handlers::route_id;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /questions?page=N - one page of questions plus totals and category labels
pub async fn list(State(state): State<AppState>, Query(query): Query<PageQuery>) -> ApiResult<Value> {
    let questions = state.store.list_questions().await?;
    let page = query.page();
    let current = paginate(&questions, page);

    if current.is_empty() {
        return Err(ApiError::not_found(format!("page {} is out of range", page)));
    }

    let categories = state.store.list_categories().await?;

    Ok(ApiResponse::success(json!({
        "questions": questions_to_api_values(current),
        "total_questions": questions.len(),
        "current_category": Value::Null,
        "categories": category_labels(&categories),
    })))
}

/// POST /questions - store a new question; the store validates it
pub async fn create(State(state): State<AppState>, JsonBody(new): JsonBody<NewQuestion>) -> ApiResult<Value> {
    let question = state
        .store
        .insert_question(new)
        .await
        .map_err(ApiError::unprocessable_from)?;

    tracing::info!("Created question {} in category {}", question.id, question.category);

    Ok(ApiResponse::success(json!({
        "created": question.id,
    })))
}

/// DELETE /questions/:id - an absent id is 422, like any other failed delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let question_id = route_id(&id).ok_or_else(|| ApiError::not_found(format!("no route for question '{}'", id)))?;

    match state.store.find_question(question_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ApiError::unprocessable(format!("question {} does not exist", question_id))),
        Err(e) => return Err(ApiError::unprocessable_from(e)),
    }

    // A concurrent delete between lookup and here surfaces as 422
    state
        .store
        .delete_question(question_id)
        .await
        .map_err(ApiError::unprocessable_from)?;

    tracing::info!("Deleted question {}", question_id);

    Ok(ApiResponse::success(json!({
        "deleted": question_id,
    })))
}
