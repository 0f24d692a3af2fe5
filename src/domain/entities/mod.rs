//! Domain entities.

pub mod message;
pub mod user;

pub use message::{BroadcastMessage, DirectMessage, GroupMessage};
pub use user::User;
