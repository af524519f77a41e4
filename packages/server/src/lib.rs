//! Focus room session coordination server.
//!
//! Time-boxed, password-protected rooms with chat, reactions and a
//! peer-to-peer signaling relay over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
