//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::auth_middleware;
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // WebSocket entry point; identity comes as a query parameter
        .route("/ws", get(ws_handler))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // Protected routes (require a session token)
        .merge(protected_routes(state))
}

/// Routes behind the session-token middleware
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/dm", post(handlers::dm::send_dm))
        .route("/dm/{user}", get(handlers::dm::dm_history))
        .route("/groups", post(handlers::group::create_group))
        .route("/groups/{name}/join", post(handlers::group::join_group))
        .route("/groups/{name}/members", get(handlers::group::group_members))
        .route(
            "/groups/{name}/messages",
            post(handlers::group::send_group_message).get(handlers::group::group_history),
        )
        .route(
            "/broadcast/messages",
            post(handlers::broadcast::send_broadcast).get(handlers::broadcast::broadcast_history),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
