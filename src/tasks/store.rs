// src/tasks/store.rs

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error::{Result, TeamdeckError};
use crate::tasks::types::{
    CreateTaskRequest, Task, TaskPriority, TaskStatus, UpdateTaskRequest,
};
use crate::users::store::joined_user;

const SELECT_TASK: &str = r#"
SELECT t.id, t.title, t.description, t.project_id, t.assignee_id, t.status,
       t.priority, t.due_date, t.tags, t.created_at, t.updated_at,
       u.id AS user_id, u.name AS user_name, u.email AS user_email,
       u.avatar AS user_avatar, u.role AS user_role, u.created_at AS user_created_at
FROM tasks t
LEFT JOIN users u ON t.assignee_id = u.id
"#;

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, project_id: Option<&str>) -> Result<Vec<Task>> {
        let rows = match project_id {
            Some(project_id) => {
                sqlx::query(&format!(
                    "{SELECT_TASK} WHERE t.project_id = ? ORDER BY t.created_at DESC"
                ))
                .bind(project_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("{SELECT_TASK} ORDER BY t.created_at DESC"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let now = Utc::now();
        Ok(rows.into_iter().map(|row| row_to_task(row, now)).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Task>> {
        let row = sqlx::query(&format!("{SELECT_TASK} WHERE t.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row_to_task(row, Utc::now())))
    }

    pub async fn create(&self, req: CreateTaskRequest) -> Result<Task> {
        let id = Uuid::new_v4().to_string();
        let status = req.status.unwrap_or(TaskStatus::Backlog);
        let priority = req.priority.unwrap_or(TaskPriority::Medium);
        let tags = req.tags.unwrap_or_default();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, project_id, assignee_id,
                               status, priority, due_date, tags, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.project_id)
        .bind(&req.assignee_id)
        .bind(status.to_string())
        .bind(priority.to_string())
        .bind(req.due_date.map(|d| d.naive_utc()))
        .bind(serde_json::to_string(&tags)?)
        .bind(now.naive_utc())
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        self.refresh_project_counters(&req.project_id).await?;

        self.get(&id)
            .await?
            .ok_or_else(|| TeamdeckError::Other("task missing after insert".to_string()))
    }

    pub async fn update(&self, id: &str, updates: UpdateTaskRequest) -> Result<Option<Task>> {
        let existing = self.get(id).await?;
        let Some(mut task) = existing else {
            return Ok(None);
        };

        if let Some(title) = updates.title {
            task.title = title;
        }
        if updates.description.is_some() {
            task.description = updates.description;
        }
        if updates.assignee_id.is_some() {
            task.assignee_id = updates.assignee_id;
        }
        if let Some(status) = updates.status {
            task.status = status;
        }
        if let Some(priority) = updates.priority {
            task.priority = priority;
        }
        if updates.due_date.is_some() {
            task.due_date = updates.due_date;
        }
        if let Some(tags) = updates.tags {
            task.tags = tags;
        }

        task.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, assignee_id = ?, status = ?,
                priority = ?, due_date = ?, tags = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.assignee_id)
        .bind(task.status.to_string())
        .bind(task.priority.to_string())
        .bind(task.due_date.map(|d| d.naive_utc()))
        .bind(serde_json::to_string(&task.tags)?)
        .bind(task.updated_at.naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.refresh_project_counters(&task.project_id).await?;

        self.get(id).await
    }

    pub async fn set_status(&self, id: &str, status: TaskStatus) -> Result<Option<Task>> {
        self.update(
            id,
            UpdateTaskRequest {
                title: None,
                description: None,
                assignee_id: None,
                status: Some(status),
                priority: None,
                due_date: None,
                tags: None,
            },
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let project_id: Option<(String,)> =
            sqlx::query_as("SELECT project_id FROM tasks WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            if let Some((project_id,)) = project_id {
                self.refresh_project_counters(&project_id).await?;
            }
        }

        Ok(deleted)
    }

    /// Overdue = due date in the past and the task not done.
    pub async fn count_overdue(&self, project_id: &str) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE project_id = ?
              AND due_date IS NOT NULL AND due_date < ? AND status != 'done'
            "#,
        )
        .bind(project_id)
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Recomputes the owning project's task counters and progress after a
    /// task mutation. Progress is the completed share rounded to a whole
    /// percent, 0 for an empty project.
    async fn refresh_project_counters(&self, project_id: &str) -> Result<()> {
        let (total, done): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'done')
            FROM tasks
            WHERE project_id = ?
            "#,
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        let progress = if total == 0 {
            0
        } else {
            ((done as f64 / total as f64) * 100.0).round() as i64
        };

        sqlx::query(
            r#"
            UPDATE projects
            SET task_count = ?, completed_task_count = ?, progress = ?
            WHERE id = ?
            "#,
        )
        .bind(total)
        .bind(done)
        .bind(progress)
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn row_to_task(row: sqlx::sqlite::SqliteRow, now: DateTime<Utc>) -> Task {
    let status: String = row.get("status");
    let status = status.parse().unwrap_or(TaskStatus::Backlog);
    let priority: String = row.get("priority");
    let due_date: Option<NaiveDateTime> = row.get("due_date");
    let due_date = due_date.map(|d| Utc.from_utc_datetime(&d));
    let tags_json: Option<String> = row.get("tags");
    let created_at: NaiveDateTime = row.get("created_at");
    let updated_at: NaiveDateTime = row.get("updated_at");

    let is_overdue = due_date
        .map(|d| d < now && status != TaskStatus::Done)
        .unwrap_or(false);

    Task {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        project_id: row.get("project_id"),
        assignee_id: row.get("assignee_id"),
        assignee: joined_user(&row),
        status,
        priority: priority.parse().unwrap_or(TaskPriority::Medium),
        due_date,
        is_overdue,
        tags: tags_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default(),
        created_at: Utc.from_utc_datetime(&created_at),
        updated_at: Utc.from_utc_datetime(&updated_at),
    }
}
