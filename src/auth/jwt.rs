// src/auth/jwt.rs

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::{Result, TeamdeckError};
use crate::users::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub role: String,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at timestamp
}

pub fn create_token(user: &User) -> Result<String> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::days(CONFIG.auth.token_ttl_days))
        .ok_or_else(|| TeamdeckError::Other("Failed to calculate expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    let header = Header::default();
    let key = EncodingKey::from_secret(CONFIG.auth.jwt_secret.as_bytes());

    Ok(encode(&header, &claims, &key)?)
}

pub fn verify_token(token: &str) -> Result<Claims> {
    let key = DecodingKey::from_secret(CONFIG.auth.jwt_secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| TeamdeckError::Unauthorized("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::UserRole;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: "user-1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            avatar: None,
            role: UserRole::Member,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = create_token(&sample_user()).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, "member");
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_token("not-a-token").is_err());
    }
}
