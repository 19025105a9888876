// src/standups/store.rs

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error::{Result, TeamdeckError};
use crate::standups::types::{Standup, SubmitStandupRequest};
use crate::users::store::joined_user;

const SELECT_STANDUP: &str = r#"
SELECT s.id, s.user_id AS standup_user_id, s.team_id, s.date, s.yesterday, s.today,
       s.blockers, s.created_at,
       u.id AS user_id, u.name AS user_name, u.email AS user_email,
       u.avatar AS user_avatar, u.role AS user_role, u.created_at AS user_created_at
FROM standups s
INNER JOIN users u ON s.user_id = u.id
"#;

#[derive(Clone)]
pub struct StandupStore {
    pool: SqlitePool,
}

impl StandupStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, team_id: &str, date: Option<NaiveDate>) -> Result<Vec<Standup>> {
        let rows = match date {
            Some(date) => {
                sqlx::query(&format!(
                    "{SELECT_STANDUP} WHERE s.team_id = ? AND s.date = ? ORDER BY s.created_at DESC"
                ))
                .bind(team_id)
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "{SELECT_STANDUP} WHERE s.team_id = ? ORDER BY s.created_at DESC"
                ))
                .bind(team_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(row_to_standup).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Standup>> {
        let row = sqlx::query(&format!("{SELECT_STANDUP} WHERE s.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(row_to_standup))
    }

    /// Upsert keyed on (user, team, date): resubmitting the same day's
    /// standup replaces its content.
    pub async fn submit(&self, user_id: &str, req: SubmitStandupRequest) -> Result<Standup> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO standups (id, user_id, team_id, date, yesterday, today, blockers, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, team_id, date)
            DO UPDATE SET yesterday = excluded.yesterday,
                          today = excluded.today,
                          blockers = excluded.blockers,
                          created_at = excluded.created_at
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&req.team_id)
        .bind(req.date)
        .bind(&req.yesterday)
        .bind(&req.today)
        .bind(&req.blockers)
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        // The upsert may have kept a preexisting row id; fetch by key.
        let row = sqlx::query(&format!(
            "{SELECT_STANDUP} WHERE s.user_id = ? AND s.team_id = ? AND s.date = ?"
        ))
        .bind(user_id)
        .bind(&req.team_id)
        .bind(req.date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_standup)
            .ok_or_else(|| TeamdeckError::Other("standup missing after upsert".to_string()))
    }
}

fn row_to_standup(row: sqlx::sqlite::SqliteRow) -> Standup {
    let created_at: NaiveDateTime = row.get("created_at");

    Standup {
        id: row.get("id"),
        user_id: row.get("standup_user_id"),
        user: joined_user(&row),
        team_id: row.get("team_id"),
        date: row.get("date"),
        yesterday: row.get("yesterday"),
        today: row.get("today"),
        blockers: row.get("blockers"),
        created_at: Utc.from_utc_datetime(&created_at),
    }
}
