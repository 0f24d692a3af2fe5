//! Broadcast Handlers

use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::application::dto::request::SendBroadcastRequest;
use crate::application::dto::response::StatusResponse;
use crate::domain::BroadcastMessage;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::dm::message_service;

/// Send a broadcast message from the authenticated user
pub async fn send_broadcast(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SendBroadcastRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    message_service(&state)
        .send_broadcast(&auth.username, &body.content)
        .await?;

    Ok(Json(StatusResponse::new("Broadcast sent")))
}

/// Full broadcast history
pub async fn broadcast_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<BroadcastMessage>>, AppError> {
    let messages = message_service(&state).broadcast_history().await?;
    Ok(Json(messages))
}
