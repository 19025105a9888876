// src/auth/service.rs

use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::jwt::create_token;
use super::models::{AuthResponse, LoginRequest, RegisterRequest, UserWithPassword};
use super::password::{hash_password, verify_password};
use crate::error::{Result, TeamdeckError};
use crate::users::UserRole;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct AuthService {
    db: SqlitePool,
}

impl AuthService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse> {
        if !EMAIL_RE.is_match(&req.email) {
            return Err(TeamdeckError::InvalidInput("invalid email format".to_string()));
        }

        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(TeamdeckError::InvalidInput(
                "password must be at least 8 characters".to_string(),
            ));
        }

        if self.email_exists(&req.email).await? {
            return Err(TeamdeckError::Conflict("Email already registered".to_string()));
        }

        let user_id = Uuid::new_v4().to_string();
        let password_hash = hash_password(&req.password)?;
        let role = req.role.unwrap_or(UserRole::Member);
        let now = chrono::Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&password_hash)
        .bind(role.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        let user = self.get_user_by_id(&user_id).await?.into();
        let token = create_token(&user)?;

        Ok(AuthResponse { user, token })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let row = self
            .get_user_by_email(&req.email)
            .await?
            .ok_or_else(|| TeamdeckError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&req.password, &row.password_hash)? {
            return Err(TeamdeckError::Unauthorized("Invalid credentials".to_string()));
        }

        let user = row.into();
        let token = create_token(&user)?;

        Ok(AuthResponse { user, token })
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<UserWithPassword> {
        sqlx::query_as::<_, UserWithPassword>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.db)
            .await
            .map_err(|_| TeamdeckError::NotFound("User not found".to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserWithPassword>> {
        Ok(
            sqlx::query_as::<_, UserWithPassword>("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.db)
                .await?,
        )
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.db)
            .await?;

        Ok(count.0 > 0)
    }
}
