// src/api/http/tasks.rs

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AuthUser;
use crate::state::AppState;
use crate::tasks::types::{TasksQuery, UpdateTaskStatusRequest};
use crate::tasks::{CreateTaskRequest, Task, UpdateTaskRequest};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
        .route("/{id}/status", patch(update_task_status))
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<TasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.task_store.list(query.project_id.as_deref()).await?))
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let task = state
        .task_store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(Json(task))
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    super::projects::require_project_access(&state, &req.project_id, &user.id).await?;

    let task = state.task_store.create(req).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = state
        .task_store
        .update(&id, req)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(Json(task))
}

async fn update_task_status(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> ApiResult<Json<Task>> {
    let task = state
        .task_store
        .set_status(&id, req.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(Json(task))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.task_store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Task not found"))
    }
}
