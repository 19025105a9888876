// src/insights/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::projects::{Project, ProjectStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Risk,
    Health,
    Suggestion,
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightType::Risk => write!(f, "risk"),
            InsightType::Health => write!(f, "health"),
            InsightType::Suggestion => write!(f, "suggestion"),
        }
    }
}

impl std::str::FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "risk" => Ok(InsightType::Risk),
            "health" => Ok(InsightType::Health),
            "suggestion" => Ok(InsightType::Suggestion),
            _ => Err(format!("Unknown insight type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for InsightSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightSeverity::Low => write!(f, "low"),
            InsightSeverity::Medium => write!(f, "medium"),
            InsightSeverity::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for InsightSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(InsightSeverity::Low),
            "medium" => Ok(InsightSeverity::Medium),
            "high" => Ok(InsightSeverity::High),
            _ => Err(format!("Unknown insight severity: {s}")),
        }
    }
}

/// A derived, advisory record flagging project risk, health, or a
/// suggested action. Written once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    pub project_id: String,
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub severity: InsightSeverity,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// What a rule produces before persistence assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightDraft {
    pub kind: InsightType,
    pub severity: InsightSeverity,
    pub title: String,
    pub description: String,
}

/// Point-in-time read of a project's aggregate state; the rule engine's
/// only input. Assembled from one project read plus one overdue-count
/// read, never retained.
#[derive(Debug, Clone)]
pub struct ProjectSnapshot {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub progress: i64,
    pub overdue_tasks: i64,
    pub task_count: i64,
    pub completed_task_count: i64,
    pub updated_at: DateTime<Utc>,
}

impl ProjectSnapshot {
    pub fn new(project: Project, overdue_tasks: i64) -> Self {
        Self {
            id: project.id,
            name: project.name,
            status: project.status,
            progress: project.progress,
            overdue_tasks,
            task_count: project.task_count,
            completed_task_count: project.completed_task_count,
            updated_at: project.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInsightRequest {
    pub project_id: String,
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub severity: InsightSeverity,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub project_id: Option<String>,
}
