// src/insights/store.rs

use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error::Result;
use crate::insights::types::{Insight, InsightDraft, InsightSeverity, InsightType};

#[derive(Clone)]
pub struct InsightStore {
    pool: SqlitePool,
}

impl InsightStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, project_id: Option<&str>) -> Result<Vec<Insight>> {
        let rows = match project_id {
            Some(project_id) => {
                sqlx::query(
                    r#"
                    SELECT id, project_id, type, severity, title, description, created_at
                    FROM project_insights
                    WHERE project_id = ?
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(project_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, project_id, type, severity, title, description, created_at
                    FROM project_insights
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(row_to_insight).collect())
    }

    /// Persists a draft, assigning id and creation timestamp.
    pub async fn insert(&self, project_id: &str, draft: InsightDraft) -> Result<Insight> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO project_insights (id, project_id, type, severity, title, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(project_id)
        .bind(draft.kind.to_string())
        .bind(draft.severity.to_string())
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(Insight {
            id,
            project_id: project_id.to_string(),
            kind: draft.kind,
            severity: draft.severity,
            title: draft.title,
            description: draft.description,
            created_at: now,
        })
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM project_insights WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Dedupe probe: does an insight with this type and title already
    /// exist for the project?
    pub async fn exists_similar(
        &self,
        project_id: &str,
        kind: InsightType,
        title: &str,
    ) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM project_insights WHERE project_id = ? AND type = ? AND title = ?",
        )
        .bind(project_id)
        .bind(kind.to_string())
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }
}

fn row_to_insight(row: sqlx::sqlite::SqliteRow) -> Insight {
    let kind: String = row.get("type");
    let severity: String = row.get("severity");
    let created_at: NaiveDateTime = row.get("created_at");

    Insight {
        id: row.get("id"),
        project_id: row.get("project_id"),
        kind: kind.parse().unwrap_or(InsightType::Suggestion),
        severity: severity.parse().unwrap_or(InsightSeverity::Low),
        title: row.get("title"),
        description: row.get("description"),
        created_at: Utc.from_utc_datetime(&created_at),
    }
}
