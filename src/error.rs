//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::repository::RepositoryError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    // Server errors (5xx)
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Domain(domain_err) if domain_err.is_conflict_error() => StatusCode::CONFLICT,
            AppError::Domain(_) => StatusCode::BAD_REQUEST,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                ("Invalid request".to_string(), "invalid_request", Some(msg.clone()))
            }

            // 400 validation / 409 conflict
            AppError::Domain(domain_err) => (domain_err.to_string(), domain_err.error_code(), None),

            // 500 Internal Server Error: details are logged, never returned
            AppError::Repository(e) => {
                tracing::error!(
                    operation = e.operation(),
                    entity_type = e.entity_type(),
                    "Repository error: {:?}",
                    e
                );
                ("Internal server error".to_string(), "repository_error", None)
            }
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
