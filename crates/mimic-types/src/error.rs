use std::time::Duration;

use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in mimic-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to profile and persona management.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile not found")]
    NotFound,

    #[error("persona not found")]
    PersonaNotFound,

    #[error("invalid attributes: {0}")]
    InvalidAttributes(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<RepositoryError> for ProfileError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ProfileError::NotFound,
            other => ProfileError::StorageError(other.to_string()),
        }
    }
}

/// Failure of a single bounded generation call.
///
/// `Timeout` and `Backend` are kept distinct so the orchestrator can pick
/// the matching fallback reply and log signature.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("generation backend error: {0}")]
    Backend(#[from] LlmError),

    #[error("generation backend returned no text")]
    EmptyResponse,
}

impl GenerationError {
    /// Whether this failure was caused by the deadline elapsing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, GenerationError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_profile_error_from_repository_not_found() {
        let err: ProfileError = RepositoryError::NotFound.into();
        assert!(matches!(err, ProfileError::NotFound));

        let err: ProfileError = RepositoryError::Query("locked".to_string()).into();
        assert!(matches!(err, ProfileError::StorageError(msg) if msg.contains("locked")));
    }

    #[test]
    fn test_generation_error_timeout_display() {
        let err = GenerationError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "generation timed out after 30000ms");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_generation_error_from_llm_error() {
        let err: GenerationError = LlmError::Stream("connection reset".to_string()).into();
        assert!(!err.is_timeout());
        assert!(err.to_string().contains("connection reset"));
    }
}
