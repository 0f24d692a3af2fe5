//! Outbound Deliverer
//!
//! Routes an envelope received off a bus subscription to the matching
//! local socket(s), or drops it silently when no local socket matches.

use std::sync::Arc;

use crate::domain::Envelope;
use crate::infrastructure::metrics;

use super::registry::{Connection, ConnectionRegistry};

/// Bus-to-local-socket router.
pub struct OutboundDeliverer {
    registry: Arc<ConnectionRegistry>,
}

impl OutboundDeliverer {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Route one envelope to local connections.
    ///
    /// Write failures are logged and skipped; they never remove the
    /// connection from the registry here. Disconnection is detected
    /// independently by the connection's own read loop.
    pub fn deliver(&self, envelope: Envelope) {
        match &envelope {
            Envelope::Broadcast { from, .. } => {
                // Everyone except the sender: the sender already shows the
                // message locally via its own submission path.
                for connection in self.registry.snapshot_all() {
                    if connection.user() == from {
                        continue;
                    }
                    self.write(&connection, envelope.clone());
                }
            }
            Envelope::Group { to: group, .. } => {
                // Every local member that listed the group at connect time.
                for connection in self.registry.snapshot_all() {
                    if !connection.is_in_group(group) {
                        continue;
                    }
                    self.write(&connection, envelope.clone());
                }
            }
            Envelope::Dm { to, .. } => {
                // No local recipient is not an error; another instance may
                // hold the socket, or the user is offline.
                if let Some(connection) = self.registry.lookup_local(to) {
                    self.write(&connection, envelope.clone());
                }
            }
        }
    }

    fn write(&self, connection: &Connection, envelope: Envelope) {
        let kind = envelope.kind();
        if let Err(e) = connection.send(envelope) {
            tracing::warn!(
                user = %connection.user(),
                error = %e,
                "Dropping undeliverable message"
            );
            return;
        }
        metrics::MESSAGES_DELIVERED_TOTAL
            .with_label_values(&[kind])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use uuid::Uuid;

    fn register(
        registry: &ConnectionRegistry,
        user: &str,
        groups: &[&str],
    ) -> UnboundedReceiver<Envelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        registry.register(Connection::new(
            user.to_string(),
            Uuid::new_v4(),
            groups.iter().map(|g| g.to_string()).collect(),
            tx,
        ));
        rx
    }

    #[test]
    fn broadcast_suppresses_the_sender() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut alice = register(&registry, "alice", &[]);
        let mut bob = register(&registry, "bob", &[]);
        let mut carol = register(&registry, "carol", &[]);

        let deliverer = OutboundDeliverer::new(registry);
        deliverer.deliver(Envelope::Broadcast {
            from: "carol".into(),
            content: "hey all".into(),
        });

        assert!(alice.try_recv().is_ok());
        assert!(bob.try_recv().is_ok());
        assert!(carol.try_recv().is_err());
    }

    #[test]
    fn dm_goes_to_the_single_recipient() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut alice = register(&registry, "alice", &[]);
        let mut bob = register(&registry, "bob", &[]);

        let envelope = Envelope::Dm {
            from: "alice".into(),
            to: "bob".into(),
            content: "hi".into(),
        };
        let deliverer = OutboundDeliverer::new(registry);
        deliverer.deliver(envelope.clone());

        assert_eq!(bob.try_recv().unwrap(), envelope);
        assert!(alice.try_recv().is_err());
    }

    #[test]
    fn dm_with_no_local_recipient_is_dropped_silently() {
        let registry = Arc::new(ConnectionRegistry::new());
        let deliverer = OutboundDeliverer::new(registry);
        deliverer.deliver(Envelope::Dm {
            from: "alice".into(),
            to: "nobody".into(),
            content: "hi".into(),
        });
    }

    #[test]
    fn group_messages_reach_members_only() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut alice = register(&registry, "alice", &["rustaceans"]);
        let mut bob = register(&registry, "bob", &["rustaceans", "ops"]);
        let mut carol = register(&registry, "carol", &["ops"]);

        let deliverer = OutboundDeliverer::new(registry);
        deliverer.deliver(Envelope::Group {
            from: "alice".into(),
            to: "rustaceans".into(),
            content: "hi".into(),
        });

        assert!(alice.try_recv().is_ok());
        assert!(bob.try_recv().is_ok());
        assert!(carol.try_recv().is_err());
    }

    #[test]
    fn one_dead_connection_does_not_block_the_rest() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut alice = register(&registry, "alice", &[]);
        let bob_rx = register(&registry, "bob", &[]);
        drop(bob_rx); // bob's writer task is gone

        let deliverer = OutboundDeliverer::new(registry);
        deliverer.deliver(Envelope::Broadcast {
            from: "carol".into(),
            content: "hey all".into(),
        });

        assert!(alice.try_recv().is_ok());
    }
}
