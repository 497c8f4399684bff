//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http_body_util::LengthLimitError;
use logsight_core::CoreError;
use serde::Serialize;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 413 Payload Too Large
    PayloadTooLarge(String),
    /// 500 Internal Server Error
    Internal(String),
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        if status.is_server_error() {
            tracing::error!(error = error_type, %message, "API error");
        } else {
            tracing::debug!(error = error_type, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(e) if is_length_limit(&e) => {
                ApiError::PayloadTooLarge("Upload exceeds the configured size limit".to_string())
            }
            CoreError::Io(e) => ApiError::BadRequest(format!("Unable to read upload: {}", e)),
        }
    }
}

/// The body limit layer reports an oversized streamed body as a read error
/// whose source chain holds a [`LengthLimitError`]
pub(crate) fn is_length_limit(err: &std::io::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = err.get_ref().map(|e| e as _);
    while let Some(e) = source {
        if e.downcast_ref::<LengthLimitError>().is_some() {
            return true;
        }
        source = e.source();
    }
    false
}
