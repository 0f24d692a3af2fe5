//! WebSocket Connection Handler
//!
//! The upgrade entry point and the per-connection read loop.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::domain::{Envelope, GroupRepository};
use crate::infrastructure::repositories::RedisGroupRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::registry::Connection;
use super::session::{ConnectionState, SessionState};

/// Query parameters of the upgrade request.
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub user: Option<String>,
}

/// WebSocket upgrade handler.
///
/// The identity comes as a query parameter; without one there is no
/// upgrade, just an error response.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let user = params
        .user
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing user query parameter".into()))?;

    let ws = ws
        .max_message_size(state.settings.websocket.max_message_size)
        .max_frame_size(state.settings.websocket.max_frame_size);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, user, state)))
}

/// Handle one WebSocket connection until its read side ends.
async fn handle_socket(socket: WebSocket, user: String, state: AppState) {
    let mut session = SessionState::new(user.clone());
    tracing::debug!(
        user = %user,
        connection_id = %session.connection_id,
        "New WebSocket connection"
    );

    // Split socket for concurrent read/write.
    let (mut sender, mut receiver) = socket.split();

    // Writer task: owns the sink, drains the outbound channel. Dropping
    // every sender (disconnect or replacement) ends it.
    let (tx, mut rx) = mpsc::unbounded_channel::<Envelope>();
    let writer = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            let text = match serde_json::to_string(&envelope) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize outbound envelope");
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Membership is fetched once, here; later joins take effect on the
    // next connect.
    let groups = match RedisGroupRepository::new(state.redis.clone())
        .groups_of(&user)
        .await
    {
        Ok(groups) => groups,
        Err(e) => {
            tracing::warn!(user = %user, error = %e, "Failed to fetch group memberships");
            Vec::new()
        }
    };

    state.subscriptions.ensure_for_user(&user, &groups).await;
    state.registry.register(Connection::new(
        user.clone(),
        session.connection_id,
        groups,
        tx,
    ));
    advance(&mut session, ConnectionState::Registered);
    tracing::info!(user = %user, connection_id = %session.connection_id, "User connected");

    // Read loop: the only way out is a close frame, a read error, or the
    // peer going away.
    advance(&mut session, ConnectionState::Reading);
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                advance(&mut session, ConnectionState::Dispatching);
                match serde_json::from_str::<Envelope>(&text) {
                    Ok(envelope) => state.dispatcher.dispatch(&envelope).await,
                    Err(e) => {
                        // Unknown kind or malformed frame: ignored, no
                        // error surfaced to the sender.
                        tracing::debug!(user = %user, error = %e, "Ignoring malformed frame");
                    }
                }
                advance(&mut session, ConnectionState::Reading);
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(user = %user, "Connection closed by client");
                break;
            }
            Ok(_) => {
                // Ping/pong are answered by axum; binary frames carry no
                // envelopes.
            }
            Err(e) => {
                tracing::debug!(user = %user, error = %e, "WebSocket error");
                break;
            }
        }
    }

    advance(&mut session, ConnectionState::Closed);
    state.registry.unregister(&user, session.connection_id);
    writer.abort();
    tracing::info!(user = %user, connection_id = %session.connection_id, "User disconnected");
}

fn advance(session: &mut SessionState, next: ConnectionState) {
    if let Err(e) = session.advance(next) {
        tracing::debug!(user = %session.user, error = %e, "Unexpected session state");
    }
}
