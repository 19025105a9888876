// src/workload/service.rs
// Team workload and dashboard aggregation over repository counts.

use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};

use crate::error::Result;
use crate::users::{User, UserRole};
use crate::workload::types::{DashboardMetrics, UserWorkload};

/// Workload strictly above this percentage counts as overloaded.
const OVERLOAD_THRESHOLD: i64 = 80;

#[derive(Clone)]
pub struct WorkloadService {
    pool: SqlitePool,
    max_capacity: u32,
}

impl WorkloadService {
    /// `max_capacity` is the nominal full task load per person the
    /// percentage is normalized against.
    pub fn new(pool: SqlitePool, max_capacity: u32) -> Self {
        Self { pool, max_capacity }
    }

    /// One entry per team member, ordered by member name. An empty team
    /// yields an empty vec.
    pub async fn team_workload(&self, team_id: &str) -> Result<Vec<UserWorkload>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id AS user_id, u.name AS user_name, u.email AS user_email,
                   u.avatar AS user_avatar, u.role AS user_role, u.created_at AS user_created_at,
                   COUNT(t.id) AS total_tasks,
                   COUNT(t.id) FILTER (WHERE t.status = 'done') AS completed_tasks,
                   COUNT(t.id) FILTER (WHERE t.due_date IS NOT NULL AND t.due_date < ?
                                         AND t.status != 'done') AS overdue_tasks,
                   COUNT(t.id) FILTER (WHERE t.status = 'in-progress') AS in_progress_tasks
            FROM users u
            INNER JOIN team_members tm ON u.id = tm.user_id
            LEFT JOIN tasks t ON u.id = t.assignee_id
            WHERE tm.team_id = ?
            GROUP BY u.id, u.name, u.email, u.avatar, u.role, u.created_at
            ORDER BY u.name
            "#,
        )
        .bind(Utc::now().naive_utc())
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let total_tasks: i64 = row.get("total_tasks");
                let workload_percentage = workload_percentage(total_tasks, self.max_capacity);

                let role: String = row.get("user_role");
                let created_at: NaiveDateTime = row.get("user_created_at");
                let created_at = Utc.from_utc_datetime(&created_at);
                let user_id: String = row.get("user_id");

                UserWorkload {
                    user: User {
                        id: user_id.clone(),
                        name: row.get("user_name"),
                        email: row.get("user_email"),
                        avatar: row.get("user_avatar"),
                        role: role.parse().unwrap_or(UserRole::Member),
                        created_at,
                        updated_at: created_at,
                    },
                    user_id,
                    total_tasks,
                    completed_tasks: row.get("completed_tasks"),
                    overdue_tasks: row.get("overdue_tasks"),
                    in_progress_tasks: row.get("in_progress_tasks"),
                    workload_percentage,
                    is_overloaded: workload_percentage > OVERLOAD_THRESHOLD,
                }
            })
            .collect())
    }

    /// Global snapshot from four independent aggregate reads; any failed
    /// read fails the whole call.
    pub async fn dashboard_metrics(&self) -> Result<DashboardMetrics> {
        let (total_projects, active_projects, average_progress): (i64, i64, f64) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*),
                       COUNT(*) FILTER (WHERE status = 'active'),
                       COALESCE(AVG(progress), 0.0)
                FROM projects
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let (total_tasks, completed_tasks, overdue_tasks): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'done'),
                   COUNT(*) FILTER (WHERE due_date IS NOT NULL AND due_date < ?
                                      AND status != 'done')
            FROM tasks
            "#,
        )
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await?;

        let (team_members,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let (projects_at_risk,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM project_insights WHERE type = 'risk' AND severity = 'high'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardMetrics {
            total_projects,
            active_projects,
            total_tasks,
            completed_tasks,
            overdue_tasks,
            team_members,
            projects_at_risk,
            average_progress: average_progress.round() as i64,
        })
    }
}

/// Normalized task count against nominal capacity, rounded to a whole
/// percent and capped at 100.
fn workload_percentage(total_tasks: i64, max_capacity: u32) -> i64 {
    let pct = ((total_tasks as f64 / max_capacity as f64) * 100.0).round() as i64;
    pct.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_capacity_is_one_hundred() {
        assert_eq!(workload_percentage(8, 8), 100);
    }

    #[test]
    fn test_partial_load() {
        assert_eq!(workload_percentage(6, 8), 75);
        assert_eq!(workload_percentage(0, 8), 0);
    }

    #[test]
    fn test_capped_at_one_hundred() {
        assert_eq!(workload_percentage(20, 8), 100);
    }

    #[test]
    fn test_overload_threshold_is_strict() {
        assert!(workload_percentage(7, 8) > OVERLOAD_THRESHOLD); // 88
        assert!(workload_percentage(6, 8) <= OVERLOAD_THRESHOLD); // 75
        // Exactly 80 is not overloaded, 81 is.
        assert!(workload_percentage(4, 5) <= OVERLOAD_THRESHOLD); // 80
        assert!(workload_percentage(81, 100) > OVERLOAD_THRESHOLD);
    }
}
