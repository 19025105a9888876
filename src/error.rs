// src/error.rs
// Standardized error types for teamdeck

use thiserror::Error;

/// Main error type for the teamdeck library.
///
/// `NotFound` is the only condition the domain layer raises on its own;
/// everything else is either a validation failure surfaced at a service
/// boundary or an opaque failure propagated from a collaborator.
#[derive(Error, Debug)]
pub enum TeamdeckError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("password hashing error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("unknown error: {0}")]
    Other(String),
}

/// Convenience type alias for Result using TeamdeckError
pub type Result<T> = std::result::Result<T, TeamdeckError>;

impl From<String> for TeamdeckError {
    fn from(s: String) -> Self {
        TeamdeckError::Other(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_passes_through() {
        let err = TeamdeckError::NotFound("Project not found".to_string());
        assert_eq!(err.to_string(), "Project not found");
    }

    #[test]
    fn test_invalid_input_is_prefixed() {
        let err = TeamdeckError::InvalidInput("no fields to update".to_string());
        assert!(err.to_string().contains("invalid input"));
        assert!(err.to_string().contains("no fields to update"));
    }

    #[test]
    fn test_db_error_conversion() {
        let err: TeamdeckError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, TeamdeckError::Db(_)));
        assert!(err.to_string().contains("database error"));
    }

    #[test]
    fn test_string_conversion() {
        let err: TeamdeckError = "something odd".to_string().into();
        assert!(matches!(err, TeamdeckError::Other(_)));
    }
}
