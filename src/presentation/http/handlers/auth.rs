//! Authentication Handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use validator::Validate;

use crate::application::dto::request::{LoginRequest, RegisterRequest};
use crate::application::dto::response::{StatusResponse, TokenResponse};
use crate::application::services::{AuthError, AuthService};
use crate::infrastructure::repositories::{RedisSessionRepository, RedisUserRepository};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Build the auth service over the Redis repositories.
pub(crate) fn auth_service(
    state: &AppState,
) -> AuthService<RedisUserRepository, RedisSessionRepository> {
    AuthService::new(
        Arc::new(RedisUserRepository::new(state.redis.clone())),
        Arc::new(RedisSessionRepository::new(state.redis.clone())),
        state.settings.session.ttl_seconds(),
    )
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<StatusResponse>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    auth_service(&state)
        .register(&body.username, &body.password)
        .await
        .map_err(|e| match e {
            AuthError::UsernameExists => AppError::Conflict("Username already exists".into()),
            e => AppError::Internal(e.to_string()),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse::new("User registered successfully")),
    ))
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = auth_service(&state)
        .login(&body.username, &body.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid username or password".into())
            }
            e => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(TokenResponse::new(token)))
}

/// Revoke the presented session token
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, AppError> {
    let token = bearer_token(&headers)?;

    auth_service(&state)
        .logout(token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(StatusResponse::new("Logged out")))
}

/// Extract the bearer token from the Authorization header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing or invalid Authorization header".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert!(bearer_token(&headers).is_err());

        assert!(bearer_token(&HeaderMap::new()).is_err());
    }
}
