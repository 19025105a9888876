// src/api/http/users.rs

use axum::{
    extract::{Json, Path, State},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AuthUser;
use crate::state::AppState;
use crate::users::{UpdateUserRequest, User};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(get_current_user).put(update_current_user))
        .route("/", get(list_users))
        .route("/{id}", get(get_user))
}

async fn get_current_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<User>> {
    let profile = state
        .user_store
        .get(&user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(profile))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.user_store.list().await?))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let profile = state
        .user_store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(profile))
}

async fn update_current_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.user_store.update(&user.id, req).await?))
}
