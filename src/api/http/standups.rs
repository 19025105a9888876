// src/api/http/standups.rs

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AuthUser;
use crate::standups::types::StandupsQuery;
use crate::standups::{Standup, SubmitStandupRequest};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_standups).post(submit_standup))
        .route("/{id}", get(get_standup))
}

async fn list_standups(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<StandupsQuery>,
) -> ApiResult<Json<Vec<Standup>>> {
    Ok(Json(
        state.standup_store.list(&query.team_id, query.date).await?,
    ))
}

async fn get_standup(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Standup>> {
    let standup = state
        .standup_store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Standup not found"))?;

    Ok(Json(standup))
}

async fn submit_standup(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<SubmitStandupRequest>,
) -> ApiResult<(StatusCode, Json<Standup>)> {
    super::teams::require_membership(&state, &req.team_id, &user.id).await?;

    let standup = state.standup_store.submit(&user.id, req).await?;

    Ok((StatusCode::CREATED, Json(standup)))
}
