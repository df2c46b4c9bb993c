use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::application::ApplicationStatus;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Signed in, but no profile row exists for the identity yet.
    #[error("No profile for this account")]
    NoProfile,

    #[error("Duplicate application")]
    DuplicateApplication,

    #[error("Cannot move application from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Auth provider error: {0}")]
    AuthProvider(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::NoProfile => StatusCode::FORBIDDEN,
            AppError::DuplicateApplication | AppError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::AuthProvider(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => ("UNAUTHORIZED", "Authentication required".to_string()),
            AppError::Forbidden(msg) => ("FORBIDDEN", msg.clone()),
            AppError::NoProfile => (
                "NO_PROFILE",
                "No profile exists for this account yet".to_string(),
            ),
            AppError::DuplicateApplication => (
                "DUPLICATE_APPLICATION",
                "You have already applied to this job".to_string(),
            ),
            AppError::InvalidTransition { from, to } => (
                "INVALID_TRANSITION",
                format!("Application cannot move from {from} to {to}"),
            ),
            AppError::PayloadTooLarge => (
                "PAYLOAD_TOO_LARGE",
                "Uploaded file is too large".to_string(),
            ),
            AppError::AuthProvider(msg) => {
                tracing::error!("Auth provider error: {msg}");
                (
                    "AUTH_PROVIDER_ERROR",
                    "The authentication service is unavailable".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                ("DATABASE_ERROR", "A database error occurred".to_string())
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                ("STORAGE_ERROR", "A storage error occurred".to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_forbidden_are_distinct() {
        assert_eq!(
            AppError::NotFound("Job not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("not yours".into()).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_conflicts_map_to_409() {
        assert_eq!(AppError::DuplicateApplication.status(), StatusCode::CONFLICT);
        let err = AppError::InvalidTransition {
            from: ApplicationStatus::Rejected,
            to: ApplicationStatus::Shortlisted,
        };
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(
            err.to_string(),
            "Cannot move application from rejected to shortlisted"
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = AppError::Storage("bucket exploded".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
