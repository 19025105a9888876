// src/workload/types.rs

use serde::{Deserialize, Serialize};

use crate::users::User;

/// Per-member task-load view. Computed fresh on every request, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWorkload {
    pub user_id: String,
    pub user: User,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub overdue_tasks: i64,
    pub in_progress_tasks: i64,
    pub workload_percentage: i64,
    pub is_overloaded: bool,
}

/// Organization-wide summary counters. Computed fresh on every request,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_projects: i64,
    pub active_projects: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub overdue_tasks: i64,
    pub team_members: i64,
    pub projects_at_risk: i64,
    pub average_progress: i64,
}
