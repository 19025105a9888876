// src/api/http/chat.rs

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AuthUser;
use crate::chat::store::DEFAULT_MESSAGE_LIMIT;
use crate::chat::types::MessagesQuery;
use crate::chat::{ChatChannel, ChatMessage, CreateChannelRequest, SendMessageRequest};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/channels", get(list_channels).post(create_channel))
        .route("/channels/{id}", get(get_channel))
        .route("/channels/{id}/messages", get(list_messages))
        .route("/channels/{id}/read", patch(mark_read))
        .route("/messages", post(send_message))
}

async fn list_channels(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ChatChannel>>> {
    Ok(Json(state.chat_store.channels_for_user(&user.id).await?))
}

async fn get_channel(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ChatChannel>> {
    let channel = state
        .chat_store
        .get_channel(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Channel not found"))?;

    Ok(Json(channel))
}

async fn create_channel(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(mut req): Json<CreateChannelRequest>,
) -> ApiResult<(StatusCode, Json<ChatChannel>)> {
    // The creator always participates.
    if !req.participant_ids.contains(&user.id) {
        req.participant_ids.push(user.id.clone());
    }

    let channel = state.chat_store.create_channel(req).await?;

    Ok((StatusCode::CREATED, Json(channel)))
}

async fn list_messages(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    require_participant(&state, &id, &user.id).await?;

    let limit = query.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT);
    Ok(Json(state.chat_store.messages(&id, limit).await?))
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<ChatMessage>)> {
    require_participant(&state, &req.channel_id, &user.id).await?;

    let message = state
        .chat_store
        .send_message(&req.channel_id, &user.id, &req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

async fn mark_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    require_participant(&state, &id, &user.id).await?;

    state.chat_store.mark_read(&id, &user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn require_participant(
    state: &AppState,
    channel_id: &str,
    user_id: &str,
) -> ApiResult<()> {
    if state.chat_store.is_participant(channel_id, user_id).await? {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not a participant of this channel"))
    }
}
