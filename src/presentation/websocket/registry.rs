//! Connection Registry
//!
//! Per-process mapping from user identity to the live socket connection.
//! This is the single shared mutable structure in the real-time core; all
//! access goes through the operations below, never the raw map.

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::Envelope;
use crate::infrastructure::metrics;

/// Handle to one live WebSocket connection.
///
/// The sender feeds the connection's writer task, which owns the socket
/// sink. Dropping the last sender ends that task and closes the socket.
#[derive(Debug, Clone)]
pub struct Connection {
    user: String,
    id: Uuid,
    /// Group memberships captured at connect time; not refreshed while
    /// the connection lives.
    groups: Vec<String>,
    tx: mpsc::UnboundedSender<Envelope>,
}

impl Connection {
    pub fn new(
        user: String,
        id: Uuid,
        groups: Vec<String>,
        tx: mpsc::UnboundedSender<Envelope>,
    ) -> Self {
        Self {
            user,
            id,
            groups,
            tx,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Queue an envelope for the writer task. Fails only when the
    /// connection's writer is already gone.
    pub fn send(&self, envelope: Envelope) -> Result<(), mpsc::error::SendError<Envelope>> {
        self.tx.send(envelope)
    }
}

/// Registry of live connections, keyed by user identity.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<String, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection, replacing any prior one for the same user.
    ///
    /// Last writer wins. The replaced entry's sender is dropped here,
    /// which ends the superseded connection's writer task and closes its
    /// socket.
    pub fn register(&self, connection: Connection) {
        let user = connection.user.clone();
        if let Some(previous) = self.connections.insert(user.clone(), connection) {
            tracing::info!(
                user = %user,
                previous_id = %previous.id,
                "Replaced existing connection"
            );
        }
        metrics::CONNECTIONS_ACTIVE.set(self.connections.len() as i64);
    }

    /// Remove a connection. Idempotent.
    ///
    /// The entry is only removed while it still belongs to `id`, so a
    /// superseded connection's cleanup cannot evict its replacement.
    pub fn unregister(&self, user: &str, id: Uuid) {
        self.connections.remove_if(user, |_, conn| conn.id == id);
        metrics::CONNECTIONS_ACTIVE.set(self.connections.len() as i64);
    }

    /// The live connection for a user on this process, if any.
    pub fn lookup_local(&self, user: &str) -> Option<Connection> {
        self.connections.get(user).map(|entry| entry.value().clone())
    }

    /// Every live connection on this process. Used only for fanout.
    pub fn snapshot_all(&self) -> Vec<Connection> {
        self.connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
