//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use mimic_types::error::{ProfileError, RepositoryError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Profile and persona errors.
    Profile(ProfileError),
    /// History store errors.
    Repository(RepositoryError),
    /// Request failed validation.
    Validation(String),
    /// A required collaborator is not configured.
    Unavailable(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        AppError::Profile(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Profile(ProfileError::NotFound) => (
                StatusCode::NOT_FOUND,
                "PROFILE_NOT_FOUND",
                "Profile not found".to_string(),
            ),
            AppError::Profile(ProfileError::PersonaNotFound) => (
                StatusCode::NOT_FOUND,
                "PERSONA_NOT_FOUND",
                "Persona not found".to_string(),
            ),
            AppError::Profile(ProfileError::InvalidAttributes(msg))
            | AppError::Profile(ProfileError::InvalidId(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Profile(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Repository(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UNAVAILABLE",
                msg.clone(),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, error = %message, "Request failed");
        }

        (status, Json(ApiResponse::error(code, &message))).into_response()
    }
}
