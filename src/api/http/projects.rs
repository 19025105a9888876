// src/api/http/projects.rs

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AuthUser;
use crate::projects::types::ProjectsQuery;
use crate::projects::{CreateProjectRequest, Project, UpdateProjectRequest};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<ProjectsQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.project_store.list(query.team_id.as_deref()).await?))
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    require_project_access(&state, &id, &user.id).await?;

    let project = state
        .project_store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    Ok(Json(project))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    super::teams::require_membership(&state, &req.team_id, &user.id).await?;

    let project = state.project_store.create(req).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    require_project_access(&state, &id, &user.id).await?;

    let project = state
        .project_store
        .update(&id, req)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    Ok(Json(project))
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    require_project_access(&state, &id, &user.id).await?;

    if state.project_store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Project not found"))
    }
}

/// The caller must belong to the team that owns the project. A project
/// that does not exist at all is a 404, not a 403, so NotFound from the
/// domain layer survives the access check.
pub(crate) async fn require_project_access(
    state: &AppState,
    project_id: &str,
    user_id: &str,
) -> ApiResult<()> {
    if state.project_store.user_has_access(project_id, user_id).await? {
        return Ok(());
    }

    if state.project_store.get(project_id).await?.is_none() {
        return Err(ApiError::not_found("Project not found"));
    }

    Err(ApiError::forbidden("No access to this project"))
}
