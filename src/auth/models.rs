// src/auth/models.rs

use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::users::{User, UserRole};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Internal row shape for credential checks. Only the auth service sees
/// the password hash.
#[derive(Debug, sqlx::FromRow)]
pub struct UserWithPassword {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserWithPassword> for User {
    fn from(row: UserWithPassword) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            avatar: row.avatar,
            role: row.role.parse().unwrap_or(UserRole::Member),
            created_at: Utc.from_utc_datetime(&row.created_at),
            updated_at: Utc.from_utc_datetime(&row.updated_at),
        }
    }
}
