//! Real-time delivery subsystem
//!
//! The live-connection registry and the publish/subscribe fanout router
//! bridging per-process WebSocket connections with the shared channel
//! bus, so a message published by any server instance reaches every
//! subscribed client regardless of which instance holds the socket.

pub mod deliverer;
pub mod dispatcher;
pub mod handler;
pub mod registry;
pub mod session;
pub mod subscriptions;

pub use deliverer::OutboundDeliverer;
pub use dispatcher::InboundDispatcher;
pub use handler::ws_handler;
pub use registry::{Connection, ConnectionRegistry};
pub use session::{ConnectionState, SessionState};
pub use subscriptions::SubscriptionManager;
