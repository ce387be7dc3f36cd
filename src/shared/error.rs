//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("Policy conflict: {message}")]
    PolicyConflict {
        message: String,
        violations: Vec<String>,
    },

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<String>>,
}

/// Field-level validation error
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, errors, violations) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, 10001, msg, None, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, 10002, msg, None, None),
            AppError::Validation { message, errors } => {
                (StatusCode::BAD_REQUEST, 10007, message, Some(errors), None)
            }
            AppError::PolicyConflict {
                message,
                violations,
            } => (StatusCode::CONFLICT, 10005, message, None, Some(violations)),
            AppError::Unavailable(msg) => {
                tracing::warn!("Dependency unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    10008,
                    "Service temporarily unavailable".into(),
                    None,
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    10000,
                    "Internal server error".into(),
                    None,
                    None,
                )
            }
        };

        let body = ErrorResponse {
            code,
            message,
            errors,
            violations,
        };

        (status, Json(body)).into_response()
    }
}
