// src/users/store.rs

use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};

use crate::error::{Result, TeamdeckError};
use crate::users::types::{UpdateUserRequest, User, UserRole};

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, avatar, role, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_user))
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, avatar, role, created_at, updated_at
            FROM users
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_user).collect())
    }

    pub async fn update(&self, id: &str, updates: UpdateUserRequest) -> Result<User> {
        if updates.name.is_none() && updates.email.is_none() && updates.avatar.is_none() {
            return Err(TeamdeckError::InvalidInput("no fields to update".to_string()));
        }

        let mut user = self
            .get(id)
            .await?
            .ok_or_else(|| TeamdeckError::NotFound("User not found".to_string()))?;

        if let Some(name) = updates.name {
            user.name = name;
        }
        if let Some(email) = updates.email {
            user.email = email;
        }
        if updates.avatar.is_some() {
            user.avatar = updates.avatar;
        }

        user.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, avatar = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.avatar)
        .bind(user.updated_at.naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Build a user from `u.* AS user_*` aliased join columns. Returns None
/// when the join produced no user (NULL user_id). Joined summaries carry
/// no separate updated_at column; created_at stands in for both.
pub(crate) fn joined_user(row: &sqlx::sqlite::SqliteRow) -> Option<User> {
    let user_id: Option<String> = row.get("user_id");
    let user_id = user_id?;

    let role: String = row.get("user_role");
    let created_at: NaiveDateTime = row.get("user_created_at");
    let created_at = Utc.from_utc_datetime(&created_at);

    Some(User {
        id: user_id,
        name: row.get("user_name"),
        email: row.get("user_email"),
        avatar: row.get("user_avatar"),
        role: role.parse().unwrap_or(UserRole::Member),
        created_at,
        updated_at: created_at,
    })
}

pub(crate) fn row_to_user(row: sqlx::sqlite::SqliteRow) -> User {
    let role: String = row.get("role");
    let created_at: NaiveDateTime = row.get("created_at");
    let updated_at: NaiveDateTime = row.get("updated_at");

    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        avatar: row.get("avatar"),
        role: role.parse().unwrap_or(UserRole::Member),
        created_at: Utc.from_utc_datetime(&created_at),
        updated_at: Utc.from_utc_datetime(&updated_at),
    }
}
