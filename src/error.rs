// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::manager::DatabaseError;

/// HTTP API error with a fixed client-facing message per status code.
///
/// The carried string is the internal detail; it is logged, never returned.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 405, also used for a malformed quiz category
    MethodNotAllowed(String),

    // 422 Unprocessable Entity
    UnprocessableEntity(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 400/401/403 from the permission check, with its own envelope
    Auth(AuthError),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::UnprocessableEntity(_) => 422,
            ApiError::InternalServerError(_) => 500,
            ApiError::Auth(err) => err.status,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(_) => "Error: A bad request was made",
            ApiError::NotFound(_) => "Error: The requested resource was not found",
            ApiError::MethodNotAllowed(_) => "Error: Forbidden method used",
            ApiError::UnprocessableEntity(_) => "Error: Cannot proccess request",
            ApiError::InternalServerError(_) => "Error: Internal Server Error ocurred",
            ApiError::Auth(err) => err.description,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(d)
            | ApiError::NotFound(d)
            | ApiError::MethodNotAllowed(d)
            | ApiError::UnprocessableEntity(d)
            | ApiError::InternalServerError(d) => d,
            ApiError::Auth(err) => err.code,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Auth(err) => err.to_json(),
            _ => json!({
                "success": false,
                "error": self.status_code(),
                "message": self.message()
            }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::BadRequest(detail.into())
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        ApiError::NotFound(detail.into())
    }

    pub fn method_not_allowed(detail: impl Into<String>) -> Self {
        ApiError::MethodNotAllowed(detail.into())
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        ApiError::UnprocessableEntity(detail.into())
    }

    pub fn internal_server_error(detail: impl Into<String>) -> Self {
        ApiError::InternalServerError(detail.into())
    }

    /// Any store failure as 422, for handlers whose contract has no other outcome
    pub fn unprocessable_from(err: DatabaseError) -> Self {
        tracing::error!("Store error: {}", err);
        ApiError::UnprocessableEntity(err.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Constraint(msg) => {
                tracing::warn!("Constraint violation: {}", msg);
                ApiError::unprocessable(msg)
            }
            DatabaseError::QueryError(msg) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database query error: {}", msg);
                ApiError::unprocessable(msg)
            }
            other => {
                tracing::error!("Database error: {}", other);
                ApiError::internal_server_error(other.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.detail())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
