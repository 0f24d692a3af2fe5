//! Authentication Middleware
//!
//! Session-token validation for protected routes. The token's digest is
//! looked up server-side; a hit names the authenticated user.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::presentation::http::handlers::auth::{auth_service, bearer_token};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Authenticated user extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Authentication middleware that validates session tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?.to_string();

    let username = auth_service(&state)
        .validate(&token)
        .await
        .map_err(|_| AppError::Unauthorized("Invalid or expired session token".into()))?;

    // Insert authenticated user into request extensions
    request.extensions_mut().insert(AuthUser { username });

    Ok(next.run(request).await)
}
