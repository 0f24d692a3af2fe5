//! # Domain Layer
//!
//! Core types and contracts of the chat system, independent of any
//! framework or infrastructure concern.
//!
//! - **entities**: users and stored message records
//! - **envelope**: the real-time wire unit and its topic/key projections
//! - **topic**: bus channel naming
//! - **keys**: storage key derivation shared by both delivery paths
//! - **bus / repositories**: ports implemented by the infrastructure layer

pub mod bus;
pub mod entities;
pub mod envelope;
pub mod keys;
pub mod repositories;
pub mod topic;

pub use bus::{BusStream, ChannelBus};
pub use entities::{BroadcastMessage, DirectMessage, GroupMessage, User};
pub use envelope::Envelope;
pub use repositories::{GroupRepository, HistoryStore, SessionRepository, UserRepository};
pub use topic::Topic;
