//! Error types for plp-web

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// No playlist could be generated (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Engine error; the status depends on the variant
    #[error(transparent)]
    Engine(#[from] plp_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Engine(plp_common::Error::Resolver { status }) => (
                StatusCode::BAD_GATEWAY,
                "RESOLVER_ERROR",
                format!("The search API returned an error ({status})"),
            ),
            ApiError::Engine(err @ plp_common::Error::Timeout(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", err.to_string())
            }
            ApiError::Engine(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
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

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
