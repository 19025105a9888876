// src/projects/store.rs

use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::projects::types::{
    CreateProjectRequest, Project, ProjectStatus, UpdateProjectRequest,
};

#[derive(Clone)]
pub struct ProjectStore {
    pool: SqlitePool,
}

impl ProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, team_id: Option<&str>) -> Result<Vec<Project>> {
        let rows = match team_id {
            Some(team_id) => {
                sqlx::query(
                    r#"
                    SELECT id, name, description, team_id, status, progress, due_date,
                           task_count, completed_task_count, created_at, updated_at
                    FROM projects
                    WHERE team_id = ?
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(team_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, name, description, team_id, status, progress, due_date,
                           task_count, completed_task_count, created_at, updated_at
                    FROM projects
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(row_to_project).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Project>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, team_id, status, progress, due_date,
                   task_count, completed_task_count, created_at, updated_at
            FROM projects
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_project))
    }

    pub async fn create(&self, req: CreateProjectRequest) -> Result<Project> {
        let id = Uuid::new_v4().to_string();
        let status = req.status.unwrap_or(ProjectStatus::Active);
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, team_id, status, due_date,
                                  progress, task_count, completed_task_count, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, 0, 0, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.team_id)
        .bind(status.to_string())
        .bind(req.due_date.map(|d| d.naive_utc()))
        .bind(now.naive_utc())
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(Project {
            id,
            name: req.name,
            description: req.description,
            team_id: req.team_id,
            status,
            progress: 0,
            due_date: req.due_date,
            task_count: 0,
            completed_task_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn update(&self, id: &str, updates: UpdateProjectRequest) -> Result<Option<Project>> {
        let existing = self.get(id).await?;
        let Some(mut project) = existing else {
            return Ok(None);
        };

        if let Some(name) = updates.name {
            project.name = name;
        }
        if updates.description.is_some() {
            project.description = updates.description;
        }
        if let Some(status) = updates.status {
            project.status = status;
        }
        if updates.due_date.is_some() {
            project.due_date = updates.due_date;
        }

        project.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE projects
            SET name = ?, description = ?, status = ?, due_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status.to_string())
        .bind(project.due_date.map(|d| d.naive_utc()))
        .bind(project.updated_at.naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(project))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted project {}", id);
        }

        Ok(deleted)
    }

    /// Whether the user belongs to the team that owns the project.
    pub async fn user_has_access(&self, project_id: &str, user_id: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM projects p
            INNER JOIN team_members tm ON p.team_id = tm.team_id
            WHERE p.id = ? AND tm.user_id = ?
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }
}

fn row_to_project(row: sqlx::sqlite::SqliteRow) -> Project {
    let status: String = row.get("status");
    let due_date: Option<NaiveDateTime> = row.get("due_date");
    let created_at: NaiveDateTime = row.get("created_at");
    let updated_at: NaiveDateTime = row.get("updated_at");

    Project {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        team_id: row.get("team_id"),
        status: status.parse().unwrap_or(ProjectStatus::Active),
        progress: row.get("progress"),
        due_date: due_date.map(|d| Utc.from_utc_datetime(&d)),
        task_count: row.get("task_count"),
        completed_task_count: row.get("completed_task_count"),
        created_at: Utc.from_utc_datetime(&created_at),
        updated_at: Utc.from_utc_datetime(&updated_at),
    }
}
