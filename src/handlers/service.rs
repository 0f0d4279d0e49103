use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - service description and endpoint map
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Trivia Cafe API",
            "version": version,
            "description": "Trivia questions, quizzes and a permissioned drink menu",
            "endpoints": {
                "categories": "/categories, /categories/:id/questions (public)",
                "questions": "/questions?page=N, /questions/:id (public)",
                "search": "/search (public)",
                "quizzes": "/quizzes (public)",
                "drinks": "/drinks (public GET, POST requires post:drinks)",
                "drinks_detail": "/drinks-detail (requires get:drinks-detail)",
                "drink": "/drinks/:id (PATCH requires patch:drinks, DELETE requires delete:drinks)",
                "health": "/health (public)",
            }
        }
    }))
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

/// Unknown paths get the JSON 404 envelope
pub async fn fallback() -> ApiError {
    ApiError::not_found("no such route")
}

/// Rewrite the router's bare 405 into the JSON envelope, keeping `Allow`
pub async fn method_not_allowed_envelope(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED || response.headers().contains_key(header::CONTENT_TYPE) {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    let envelope = ApiError::method_not_allowed("method not routed").into_response();
    let (envelope_parts, body) = envelope.into_parts();

    for (name, value) in envelope_parts.headers.iter() {
        parts.headers.insert(name.clone(), value.clone());
    }
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body)
}
