//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `websocket`: WebSocket を使った実装
//! - 将来的に: 複数プロセス間で配信するための `redis` pub/sub など

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
