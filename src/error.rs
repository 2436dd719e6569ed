//! Error handling module
//!
//! Boundary error type and HTTP response conversion. Classified operation
//! errors map by kind: Validation -> 400, NotFound -> 404, Conflict -> 409,
//! Internal/Unexpected -> 500. Anything unclassified falls through to a
//! generic 500 without leaking internals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::domain::{Error, ErrorKind};
use crate::gateway::GatewayError;
use crate::validation::ValidationErrors;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Boundary error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Validation-pipeline rejection; carries the field -> messages map.
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// Classified failure from a command handler.
    #[error("{0}")]
    Operation(Error),

    #[error("Invalid client credentials")]
    InvalidClientCredentials,

    // Server errors (5xx)
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<Error> for AppError {
    fn from(error: Error) -> Self {
        Self::Operation(error)
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // 400 with the collected violations under an `errors` key
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "status": 400,
                    "title": "Validation Failed",
                    "errors": errors,
                })),
            )
                .into_response(),

            AppError::Operation(error) => {
                let status = match error.kind() {
                    ErrorKind::Validation => StatusCode::BAD_REQUEST,
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::Conflict => StatusCode::CONFLICT,
                    ErrorKind::Internal | ErrorKind::Unexpected => {
                        tracing::error!("Operation failed: {}", error);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };

                let body = ErrorResponse {
                    error: error.message().to_string(),
                    error_code: error.kind().code().to_string(),
                };

                (status, Json(body)).into_response()
            }

            AppError::InvalidClientCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid client credentials".to_string(),
                    error_code: "invalid_client".to_string(),
                }),
            )
                .into_response(),

            // Generic 500 fallback: log the fault, report nothing internal
            AppError::Gateway(e) => {
                tracing::error!("Gateway error: {:?}", e);
                internal_server_error()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                internal_server_error()
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                internal_server_error()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                internal_server_error()
            }
        }
    }
}

fn internal_server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "An unexpected error occurred. Please try again later.".to_string(),
            error_code: "internal_error".to_string(),
        }),
    )
        .into_response()
}
