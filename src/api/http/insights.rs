// src/api/http/insights.rs

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AuthUser;
use crate::insights::types::{CreateInsightRequest, InsightDraft, InsightsQuery};
use crate::insights::Insight;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_insights).post(create_insight))
        .route("/generate/{project_id}", post(generate_insights))
        .route("/{id}", axum::routing::delete(delete_insight))
}

async fn list_insights(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<InsightsQuery>,
) -> ApiResult<Json<Vec<Insight>>> {
    Ok(Json(
        state.insight_store.list(query.project_id.as_deref()).await?,
    ))
}

async fn create_insight(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(req): Json<CreateInsightRequest>,
) -> ApiResult<(StatusCode, Json<Insight>)> {
    let draft = InsightDraft {
        kind: req.kind,
        severity: req.severity,
        title: req.title,
        description: req.description,
    };

    let insight = state.insight_store.insert(&req.project_id, draft).await?;

    Ok((StatusCode::CREATED, Json(insight)))
}

/// Runs the rule engine against the project's current state and returns
/// whatever was persisted, in rule order.
async fn generate_insights(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> ApiResult<(StatusCode, Json<Vec<Insight>>)> {
    super::projects::require_project_access(&state, &project_id, &user.id).await?;

    let insights = state.insight_engine.generate_for_project(&project_id).await?;

    Ok((StatusCode::CREATED, Json(insights)))
}

async fn delete_insight(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.insight_store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Insight not found"))
    }
}
