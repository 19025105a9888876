// src/api/error.rs
// Centralized error handling for HTTP API responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::TeamdeckError;

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::NOT_FOUND,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::FORBIDDEN,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(json!({
                "error": self.message
            })),
        )
            .into_response()
    }
}

impl From<TeamdeckError> for ApiError {
    fn from(err: TeamdeckError) -> Self {
        match err {
            TeamdeckError::NotFound(msg) => ApiError::not_found(msg),
            TeamdeckError::Conflict(msg) => ApiError::conflict(msg),
            TeamdeckError::InvalidInput(msg) => ApiError::bad_request(msg),
            TeamdeckError::Unauthorized(msg) => ApiError::unauthorized(msg),
            TeamdeckError::Forbidden(msg) => ApiError::forbidden(msg),
            other => {
                // Repository and other internal failures: log the detail,
                // return a generic body.
                error!("Internal error: {}", other);
                ApiError::internal("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let api: ApiError = TeamdeckError::NotFound("Project not found".to_string()).into();
        assert_eq!(api.status_code, StatusCode::NOT_FOUND);
        assert_eq!(api.message, "Project not found");
    }

    #[test]
    fn test_db_error_is_opaque_500() {
        let api: ApiError = TeamdeckError::Db(sqlx::Error::RowNotFound).into();
        assert_eq!(api.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Internal server error");
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let api: ApiError = TeamdeckError::Conflict("Email already registered".to_string()).into();
        assert_eq!(api.status_code, StatusCode::CONFLICT);
    }
}
