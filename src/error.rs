//! Error types for tunetag
//!
//! All failures surface as a JSON error body; nothing propagates as an
//! unhandled fault past the handler boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::multipart::MultipartError;
use crate::services::acr_client::RecognitionError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Missing or invalid process configuration (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-2xx response from the recognition provider; the provider's own
    /// status code is forwarded to the caller
    #[error("Provider returned HTTP {status}")]
    Provider { status: u16, body: String },

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", msg),
            ApiError::Provider { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "PROVIDER_ERROR",
                body,
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<RecognitionError> for ApiError {
    fn from(err: RecognitionError) -> Self {
        match err {
            RecognitionError::Provider { status, body } => ApiError::Provider { status, body },
            // Transport and parse detail is logged at the call site only;
            // the caller gets a generic message.
            RecognitionError::Network(_) | RecognitionError::Parse(_) => {
                ApiError::Internal("Audio recognition request failed".to_string())
            }
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
