// src/api/http/teams.rs

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AuthUser;
use crate::state::AppState;
use crate::teams::{AddMemberRequest, CreateTeamRequest, Team, TeamMember};
use crate::users::UserRole;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route("/{id}", get(get_team))
        .route("/{id}/members", get(list_members).post(add_member))
}

async fn list_teams(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(state.team_store.list_for_user(&user.id).await?))
}

async fn get_team(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Team>> {
    let team = state
        .team_store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team not found"))?;

    Ok(Json(team))
}

async fn create_team(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let team = state
        .team_store
        .create(req.name, req.description, &user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(team)))
}

async fn list_members(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    require_membership(&state, &id, &user.id).await?;

    Ok(Json(state.team_store.members(&id).await?))
}

async fn add_member(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    require_membership(&state, &id, &user.id).await?;

    let member = state
        .team_store
        .add_member(&id, &req.user_id, req.role.unwrap_or(UserRole::Member))
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Team-scoped routes are only visible to the team's own members.
pub(crate) async fn require_membership(
    state: &AppState,
    team_id: &str,
    user_id: &str,
) -> ApiResult<()> {
    if state.team_store.is_member(team_id, user_id).await? {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not a member of this team"))
    }
}
