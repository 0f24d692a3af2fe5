//! Direct Message Handlers
//!
//! REST path for sending and reading DM history. Sends here only
//! persist; real-time fanout happens exclusively on the WebSocket path.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::SendDmRequest;
use crate::application::dto::response::StatusResponse;
use crate::application::services::MessageService;
use crate::domain::DirectMessage;
use crate::infrastructure::repositories::{RedisGroupRepository, RedisHistoryStore};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

pub(crate) fn message_service(
    state: &AppState,
) -> MessageService<RedisHistoryStore, RedisGroupRepository> {
    MessageService::new(
        Arc::new(RedisHistoryStore::new(state.redis.clone())),
        Arc::new(RedisGroupRepository::new(state.redis.clone())),
    )
}

/// Send a direct message from the authenticated user
pub async fn send_dm(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SendDmRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    message_service(&state)
        .send_dm(&auth.username, &body.to, &body.content)
        .await?;

    Ok(Json(StatusResponse::new("Message sent")))
}

/// Full DM history between the authenticated user and another user
pub async fn dm_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(other): Path<String>,
) -> Result<Json<Vec<DirectMessage>>, AppError> {
    let messages = message_service(&state)
        .dm_history(&auth.username, &other)
        .await?;

    Ok(Json(messages))
}
