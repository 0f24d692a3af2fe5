//! Group Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateGroupRequest, SendGroupMessageRequest};
use crate::application::dto::response::StatusResponse;
use crate::domain::GroupMessage;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::dm::message_service;

/// Create a group with the authenticated user as first member
pub async fn create_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<StatusResponse>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    message_service(&state)
        .create_group(&body.name, &auth.username)
        .await?;

    Ok((StatusCode::CREATED, Json(StatusResponse::new("Group created"))))
}

/// Join a group as the authenticated user
pub async fn join_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(name): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    message_service(&state)
        .join_group(&name, &auth.username)
        .await?;

    Ok(Json(StatusResponse::new("Joined group")))
}

/// Send a group message from the authenticated user
pub async fn send_group_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(name): Path<String>,
    Json(body): Json<SendGroupMessageRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    message_service(&state)
        .send_group_message(&name, &auth.username, &body.content)
        .await?;

    Ok(Json(StatusResponse::new("Message sent")))
}

/// Full message history of a group
pub async fn group_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<GroupMessage>>, AppError> {
    let messages = message_service(&state).group_history(&name).await?;
    Ok(Json(messages))
}

/// Current members of a group
pub async fn group_members(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let members = message_service(&state).group_members(&name).await?;
    Ok(Json(members))
}
