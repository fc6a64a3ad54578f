//! Shared types for the API layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Uniform JSON error body returned by every failing endpoint.
#[derive(Debug)]
pub struct ApiErrorType {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, message, detail): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            message: message.to_string(),
            detail,
        }
    }
}

impl From<(StatusCode, &str)> for ApiErrorType {
    fn from((status, message): (StatusCode, &str)) -> Self {
        Self {
            status,
            message: message.to_string(),
            detail: None,
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.message,
            "detail": self.detail,
        });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tuple_with_detail() {
        let err = ApiErrorType::from((
            StatusCode::CONFLICT,
            "Already assigned",
            Some("mentor 3".to_string()),
        ));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "Already assigned");
        assert_eq!(err.detail.as_deref(), Some("mentor 3"));
    }
}
