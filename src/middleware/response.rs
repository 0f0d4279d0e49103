use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Success response whose fields sit next to `"success": true` in one flat object
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with 200 status
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return crate::error::ApiError::internal_server_error(e.to_string()).into_response();
            }
        };

        let mut envelope = json!({ "success": true });
        match data_value {
            Value::Object(fields) => {
                if let Value::Object(env) = &mut envelope {
                    for (k, v) in fields {
                        if k != "success" {
                            env.insert(k, v);
                        }
                    }
                }
            }
            Value::Null => {}
            other => envelope["data"] = other,
        }

        (StatusCode::OK, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn flattens_object_fields_into_envelope() {
        let resp = ApiResponse::success(json!({ "deleted": 4 })).into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "success": true, "deleted": 4 }));
    }

    #[tokio::test]
    async fn success_flag_cannot_be_overridden() {
        let resp = ApiResponse::success(json!({ "success": false, "drinks": [] })).into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
    }
}
