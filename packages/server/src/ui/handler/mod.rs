//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{create_room, get_activity_logs, get_room_status, health_check, join_room};
pub use websocket::websocket_handler;
