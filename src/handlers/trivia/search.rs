use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::format::questions_to_api_values;
use crate::api::JsonBody;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
}

/// POST /search - every question containing the term, unpaginated.
/// No match is a successful empty result.
pub async fn post(State(state): State<AppState>, JsonBody(request): JsonBody<SearchRequest>) -> ApiResult<Value> {
    let term = request.search_term.unwrap_or_default();

    let questions = state
        .store
        .search_questions(&term)
        .await
        .map_err(ApiError::unprocessable_from)?;

    tracing::debug!("Search '{}' matched {} questions", term, questions.len());

    Ok(ApiResponse::success(json!({
        "questions": questions_to_api_values(&questions),
        "total_questions": questions.len(),
        "current_category": Value::Null,
    })))
}
