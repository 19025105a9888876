// src/api/extract.rs
// Bearer-token extractor: handlers take an AuthUser argument and the
// token check happens before the handler body runs.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::api::error::ApiError;
use crate::auth::verify_token;
use crate::users::UserRole;

/// The authenticated caller, as carried in the token claims.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Access token required"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Access token required"))?;

        let claims =
            verify_token(token).map_err(|_| ApiError::forbidden("Invalid or expired token"))?;

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role.parse().unwrap_or(UserRole::Member),
        })
    }
}
