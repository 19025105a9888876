// src/state.rs

use sqlx::SqlitePool;

use crate::auth::AuthService;
use crate::chat::ChatStore;
use crate::config::CONFIG;
use crate::insights::{InsightEngine, InsightStore};
use crate::projects::ProjectStore;
use crate::standups::StandupStore;
use crate::tasks::TaskStore;
use crate::teams::TeamStore;
use crate::users::UserStore;
use crate::workload::WorkloadService;

/// Shared application state: one pool, one store per domain, and the two
/// derived services built on top of them.
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: AuthService,
    pub user_store: UserStore,
    pub team_store: TeamStore,
    pub project_store: ProjectStore,
    pub task_store: TaskStore,
    pub chat_store: ChatStore,
    pub standup_store: StandupStore,
    pub insight_store: InsightStore,
    pub insight_engine: InsightEngine,
    pub workload_service: WorkloadService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_options(
            pool,
            CONFIG.workload.max_capacity,
            CONFIG.insights.dedupe_generated,
        )
    }

    /// Explicit knobs for tests and alternative deployments.
    pub fn with_options(pool: SqlitePool, max_capacity: u32, dedupe_insights: bool) -> Self {
        let project_store = ProjectStore::new(pool.clone());
        let task_store = TaskStore::new(pool.clone());
        let insight_store = InsightStore::new(pool.clone());

        let insight_engine = InsightEngine::new(
            project_store.clone(),
            task_store.clone(),
            insight_store.clone(),
            dedupe_insights,
        );
        let workload_service = WorkloadService::new(pool.clone(), max_capacity);

        Self {
            auth_service: AuthService::new(pool.clone()),
            user_store: UserStore::new(pool.clone()),
            team_store: TeamStore::new(pool.clone()),
            project_store,
            task_store,
            chat_store: ChatStore::new(pool.clone()),
            standup_store: StandupStore::new(pool.clone()),
            insight_store,
            insight_engine,
            workload_service,
            pool,
        }
    }
}
