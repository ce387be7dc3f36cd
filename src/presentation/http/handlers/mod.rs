//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod analysis;
pub mod health;
pub mod listings;

use crate::application::services::{AnalysisError, PolicyError};
use crate::shared::error::AppError;

impl From<AnalysisError> for AppError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidInput(reason) => AppError::BadRequest(reason),
            AnalysisError::ModelUnavailable(e) => AppError::Unavailable(e.to_string()),
        }
    }
}

impl From<PolicyError> for AppError {
    fn from(error: PolicyError) -> Self {
        let message = error.to_string();
        match error {
            PolicyError::InvalidTransition { .. } => AppError::BadRequest(message),
            PolicyError::Violations { violations, .. } => AppError::PolicyConflict {
                message,
                violations,
            },
        }
    }
}
