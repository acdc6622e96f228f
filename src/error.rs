//! Error types for the Essay Review server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::annotations::{PersistenceError, RangeError};
use crate::html::HtmlError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid range: {0}")]
    Range(#[from] RangeError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Range(e) => {
                tracing::debug!("Rejected range: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_range", e.to_string())
            }
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {}", e);
                match e {
                    PersistenceError::Unavailable(_) => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "storage_unavailable",
                        "Storage unavailable".to_string(),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "database_error",
                        "Database error".to_string(),
                    ),
                }
            }
            AppError::Html(e) => {
                tracing::error!("HTML error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "render_error",
                    "Failed to process rendered HTML".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
