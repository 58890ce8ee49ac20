//! Error types for genbooth
//!
//! `Error` is the domain error used by the stores and the relay client;
//! `ApiError` is its HTTP-facing counterpart with an `IntoResponse` impl.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type for domain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Domain error types shared across the stores and the relay
#[derive(Debug, Error)]
pub enum Error {
    /// Requested resource not found (category file, image, snapshot)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Random pick on a category with zero records
    #[error("No tags found in {0}")]
    EmptyCategory(String),

    /// Misconfiguration (e.g. malformed prompt template)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generation backend failure (enqueue or result stream)
    #[error("Backend error: {0}")]
    Backend(String),

    /// I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Generation backend failure (502)
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::EmptyCategory(category) => {
                ApiError::NotFound(format!("No tags found in {category}"))
            }
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Backend(msg) => ApiError::BadGateway(msg),
            Error::Config(msg) => ApiError::Internal(msg),
            Error::Io(err) => ApiError::Io(err),
            Error::Json(err) => ApiError::Internal(format!("Malformed JSON state: {err}")),
            Error::Image(err) => ApiError::Internal(format!("Image processing failed: {err}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
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
pub type ApiResult<T> = std::result::Result<T, ApiError>;
