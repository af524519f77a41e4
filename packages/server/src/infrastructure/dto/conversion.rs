//! Conversion logic from domain entities to DTOs.

use focusroom_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ActivityLogEntry, ChatMessage, ParticipantView, Room, RoomEvent, RoomSnapshot, RoomStatus,
};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// Domain Entity → WebSocket DTO
// ========================================

impl From<ParticipantView> for ws::ParticipantInfo {
    fn from(model: ParticipantView) -> Self {
        Self {
            connection_id: model.connection_id.into_string(),
            name: model.name.into_string(),
            is_muted: model.is_muted,
            is_camera_off: model.is_camera_off,
        }
    }
}

impl From<ChatMessage> for ws::ChatMessageInfo {
    fn from(model: ChatMessage) -> Self {
        Self {
            sender: model.sender.into_string(),
            content: model.content.into_string(),
            is_reaction: model.is_reaction,
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
        }
    }
}

impl From<RoomSnapshot> for ws::ServerEvent {
    fn from(snapshot: RoomSnapshot) -> Self {
        ws::ServerEvent::RoomDetails {
            room_id: snapshot.room_id.into_string(),
            name: snapshot.name.map(|n| n.as_str().to_string()),
            expires_at: timestamp_to_rfc3339(snapshot.expires_at.value()),
            participants: snapshot.participants.into_iter().map(Into::into).collect(),
            messages: snapshot.messages.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RoomEvent> for ws::ServerEvent {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::Connected { connection_id } => ws::ServerEvent::Connected {
                connection_id: connection_id.into_string(),
            },
            RoomEvent::RoomDetails(snapshot) => snapshot.into(),
            RoomEvent::JoinError { reason } => ws::ServerEvent::JoinError { reason },
            RoomEvent::UserConnected(participant) => {
                ws::ServerEvent::UserConnected(participant.into())
            }
            RoomEvent::UserDisconnected {
                connection_id,
                name,
            } => ws::ServerEvent::UserDisconnected {
                connection_id: connection_id.into_string(),
                name: name.into_string(),
            },
            RoomEvent::Signal { from, payload } => ws::ServerEvent::Signal {
                from: from.into_string(),
                payload: payload.into_value(),
            },
            RoomEvent::NewMessage(message) => ws::ServerEvent::NewMessage(message.into()),
            RoomEvent::MessageError { reason } => ws::ServerEvent::MessageError { reason },
            RoomEvent::UserUpdated {
                connection_id,
                is_muted,
                is_camera_off,
            } => ws::ServerEvent::UserUpdated {
                connection_id: connection_id.into_string(),
                is_muted,
                is_camera_off,
            },
            RoomEvent::RoomStatus { request_id, status } => {
                let status = http::RoomStatusDto::from(status);
                ws::ServerEvent::RoomStatus {
                    request_id,
                    exists: status.exists,
                    participant_count: status.participant_count,
                    name: status.name,
                }
            }
            RoomEvent::RoomExpired { room_id } => ws::ServerEvent::RoomExpired {
                room_id: room_id.into_string(),
            },
        }
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<Room> for http::CreateRoomResponse {
    fn from(room: Room) -> Self {
        Self {
            room_id: room.id.into_string(),
            password: room.password.as_str().to_string(),
            expires_at: timestamp_to_rfc3339(room.expires_at.value()),
        }
    }
}

impl From<RoomStatus> for http::RoomStatusDto {
    fn from(status: RoomStatus) -> Self {
        match status {
            RoomStatus::NotFound => Self {
                exists: false,
                participant_count: None,
                name: None,
            },
            RoomStatus::Open {
                participant_count,
                name,
            } => Self {
                exists: true,
                participant_count: Some(participant_count),
                name: name.map(|n| n.as_str().to_string()),
            },
        }
    }
}

impl From<ActivityLogEntry> for http::ActivityLogEntryDto {
    fn from(entry: ActivityLogEntry) -> Self {
        Self {
            connection_id: entry.connection_id.into_string(),
            room_id: entry.room_id.into_string(),
            user_ip: entry.source_address.map(|addr| addr.ip().to_string()),
            joined_at: timestamp_to_rfc3339(entry.joined_at.value()),
            left_at: entry.left_at.map(|t| timestamp_to_rfc3339(t.value())),
        }
    }
}
