// src/insights/engine.rs
// Heuristic insight generation over a single project snapshot.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{Result, TeamdeckError};
use crate::insights::store::InsightStore;
use crate::insights::types::{Insight, InsightDraft, InsightSeverity, InsightType, ProjectSnapshot};
use crate::projects::{ProjectStatus, ProjectStore};
use crate::tasks::TaskStore;

/// Overdue counts above this escalate the risk from medium to high.
const OVERDUE_HIGH_SEVERITY_ABOVE: i64 = 3;

/// Progress at or above this marks an active project as nearing completion.
const NEAR_COMPLETION_PROGRESS: i64 = 80;

/// On-hold projects untouched for strictly more than this many days get a
/// resume suggestion.
const STALE_ON_HOLD_DAYS: i64 = 5;

/// The rules, in evaluation (and output) order. Each is independent: all
/// of them run on every generation pass, with no short-circuiting.
const RULES: &[fn(&ProjectSnapshot) -> Option<InsightDraft>] = &[
    overdue_tasks_rule,
    near_completion_rule,
    stale_on_hold_rule,
    zero_progress_rule,
];

/// Evaluates a fixed rule set against one project's current state and
/// persists whatever fires. Insights are advisory: each firing rule is
/// written immediately, so a failure partway through leaves the earlier
/// insights in place.
#[derive(Clone)]
pub struct InsightEngine {
    projects: ProjectStore,
    tasks: TaskStore,
    insights: InsightStore,
    dedupe: bool,
}

impl InsightEngine {
    pub fn new(
        projects: ProjectStore,
        tasks: TaskStore,
        insights: InsightStore,
        dedupe: bool,
    ) -> Self {
        Self {
            projects,
            tasks,
            insights,
            dedupe,
        }
    }

    pub async fn generate_for_project(&self, project_id: &str) -> Result<Vec<Insight>> {
        let project = self
            .projects
            .get(project_id)
            .await?
            .ok_or_else(|| TeamdeckError::NotFound("Project not found".to_string()))?;

        let overdue = self.tasks.count_overdue(project_id).await?;
        let snapshot = ProjectSnapshot::new(project, overdue);

        let mut generated = Vec::new();
        for rule in RULES {
            let Some(draft) = rule(&snapshot) else {
                continue;
            };

            if self.dedupe
                && self
                    .insights
                    .exists_similar(&snapshot.id, draft.kind, &draft.title)
                    .await?
            {
                debug!(
                    "Skipping duplicate {} insight '{}' for project {}",
                    draft.kind, draft.title, snapshot.id
                );
                continue;
            }

            generated.push(self.insights.insert(&snapshot.id, draft).await?);
        }

        info!(
            "Generated {} insight(s) for project {}",
            generated.len(),
            snapshot.id
        );

        Ok(generated)
    }
}

fn overdue_tasks_rule(snapshot: &ProjectSnapshot) -> Option<InsightDraft> {
    if snapshot.overdue_tasks <= 0 {
        return None;
    }

    let severity = if snapshot.overdue_tasks > OVERDUE_HIGH_SEVERITY_ABOVE {
        InsightSeverity::High
    } else {
        InsightSeverity::Medium
    };
    let phrasing = if snapshot.overdue_tasks == 1 {
        "task is"
    } else {
        "tasks are"
    };

    Some(InsightDraft {
        kind: InsightType::Risk,
        severity,
        title: "Overdue Tasks Detected".to_string(),
        description: format!(
            "{} {} overdue. This may impact project deadlines.",
            snapshot.overdue_tasks, phrasing
        ),
    })
}

fn near_completion_rule(snapshot: &ProjectSnapshot) -> Option<InsightDraft> {
    if snapshot.progress < NEAR_COMPLETION_PROGRESS || snapshot.status != ProjectStatus::Active {
        return None;
    }

    Some(InsightDraft {
        kind: InsightType::Health,
        severity: InsightSeverity::Low,
        title: "Project Nearing Completion".to_string(),
        description: format!(
            "{} is {}% complete and on track.",
            snapshot.name, snapshot.progress
        ),
    })
}

fn stale_on_hold_rule(snapshot: &ProjectSnapshot) -> Option<InsightDraft> {
    if snapshot.status != ProjectStatus::OnHold {
        return None;
    }

    // Whole days elapsed, fractional remainder discarded.
    let days_since_update = (Utc::now() - snapshot.updated_at).num_days();
    if days_since_update <= STALE_ON_HOLD_DAYS {
        return None;
    }

    Some(InsightDraft {
        kind: InsightType::Suggestion,
        severity: InsightSeverity::Medium,
        title: "Consider Resuming Project".to_string(),
        description: format!(
            "{} has been on hold for {} days. Consider resuming or archiving.",
            snapshot.name, days_since_update
        ),
    })
}

fn zero_progress_rule(snapshot: &ProjectSnapshot) -> Option<InsightDraft> {
    if snapshot.task_count == 0 || snapshot.completed_task_count != 0 {
        return None;
    }

    Some(InsightDraft {
        kind: InsightType::Risk,
        severity: InsightSeverity::Medium,
        title: "No Completed Tasks".to_string(),
        description: "Project has tasks but none are completed. Team may need support.".to_string(),
    })
}
