//! Infrastructure layer.
//!
//! - `repository`: ドメイン層の Repository trait の実装
//! - `message_pusher`: ドメイン層の MessagePusher trait の実装
//! - `dto`: ワイヤーフォーマット（WebSocket / HTTP）とドメインモデルの変換

pub mod dto;
pub mod message_pusher;
pub mod repository;
