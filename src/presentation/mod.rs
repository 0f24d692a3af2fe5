//! Presentation Layer
//!
//! HTTP routes, middleware, and the WebSocket real-time subsystem.

pub mod http;
pub mod middleware;
pub mod websocket;
