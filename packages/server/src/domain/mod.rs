//! Domain layer for the focus room service.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    ActivityLogEntry, ChatMessage, JoinOutcome, Participant, ParticipantView, Presence, Room,
    RoomSnapshot,
};
pub use error::{MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use event::{RoomEvent, RoomStatus};
pub use factory::{RoomIdFactory, RoomPasswordFactory};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{ActivityLogRepository, RoomRepository};
pub use value_object::{
    ConnectionId, MessageContent, ParticipantName, RoomDuration, RoomId, RoomName, RoomPassword,
    SignalPayload, Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::{MockActivityLogRepository, MockRoomRepository};
