// src/api/http/dashboard.rs

use axum::{
    extract::{Json, Path, State},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::extract::AuthUser;
use crate::state::AppState;
use crate::workload::{DashboardMetrics, UserWorkload};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/workload/{team_id}", get(get_team_workload))
}

async fn get_metrics(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> ApiResult<Json<DashboardMetrics>> {
    Ok(Json(state.workload_service.dashboard_metrics().await?))
}

async fn get_team_workload(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<UserWorkload>>> {
    super::teams::require_membership(&state, &team_id, &user.id).await?;

    Ok(Json(state.workload_service.team_workload(&team_id).await?))
}
