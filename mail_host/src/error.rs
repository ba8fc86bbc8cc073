use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mail_tools::AssistantError;
use serde_json::json;
use tracing::warn;

/// Failure of a request handler, rendered as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Assistant(AssistantError),
    /// Fixed message that hides the underlying cause from the caller.
    BadRequest(String),
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        ApiError::Assistant(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Assistant(AssistantError::Unauthorized) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            ApiError::Assistant(err) => {
                warn!(kind = err.kind(), "Request failed: {}", err);
                (StatusCode::BAD_REQUEST, err.client_message())
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
