//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `type` (the kebab-case event name)
//! with camelCase fields.

use serde::{Deserialize, Serialize};

/// Events sent by the client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    JoinRoom {
        room_id: String,
        name: String,
        password: String,
    },
    Signal {
        to: String,
        #[serde(alias = "signal")]
        payload: serde_json::Value,
    },
    SendMessage {
        room_id: String,
        sender: String,
        content: String,
        #[serde(default)]
        is_reaction: bool,
    },
    UserUpdate {
        room_id: String,
        #[serde(default)]
        is_muted: Option<bool>,
        #[serde(default)]
        is_camera_off: Option<bool>,
    },
    LeaveRoom,
    CheckRoom {
        room_id: String,
        #[serde(default)]
        request_id: Option<String>,
    },
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    Connected {
        connection_id: String,
    },
    RoomDetails {
        room_id: String,
        name: Option<String>,
        /// RFC 3339 (UTC)
        expires_at: String,
        participants: Vec<ParticipantInfo>,
        messages: Vec<ChatMessageInfo>,
    },
    JoinError {
        reason: String,
    },
    UserConnected(ParticipantInfo),
    UserDisconnected {
        connection_id: String,
        name: String,
    },
    Signal {
        from: String,
        payload: serde_json::Value,
    },
    NewMessage(ChatMessageInfo),
    MessageError {
        reason: String,
    },
    UserUpdated {
        connection_id: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        is_muted: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        is_camera_off: Option<bool>,
    },
    RoomStatus {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        request_id: Option<String>,
        exists: bool,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        participant_count: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        name: Option<String>,
    },
    RoomExpired {
        room_id: String,
    },
}

/// Participant information (public fields only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub connection_id: String,
    pub name: String,
    pub is_muted: bool,
    pub is_camera_off: bool,
}

/// Chat message or reaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageInfo {
    pub sender: String,
    pub content: String,
    pub is_reaction: bool,
    /// RFC 3339 (UTC)
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_room_event() {
        // テスト項目: join-room イベントが camelCase のフィールドで読み取れる
        // given (前提条件):
        let json = r#"{"type":"join-room","roomId":"a1b2c3d4","name":"alice","password":"abc123"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::JoinRoom {
                room_id: "a1b2c3d4".to_string(),
                name: "alice".to_string(),
                password: "abc123".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_signal_accepts_signal_alias() {
        // テスト項目: signal イベントのペイロードは `signal` フィールドでも受け付ける
        // given (前提条件):
        let json = r#"{"type":"signal","to":"peer-1","signal":{"type":"offer","sdp":"v=0"}}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        match event {
            ClientEvent::Signal { to, payload } => {
                assert_eq!(to, "peer-1");
                assert_eq!(payload["type"], "offer");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_user_update_with_partial_fields() {
        // テスト項目: user-update は片方のフラグだけでも読み取れる
        // given (前提条件):
        let json = r#"{"type":"user-update","roomId":"a1b2c3d4","isMuted":true}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::UserUpdate {
                room_id: "a1b2c3d4".to_string(),
                is_muted: Some(true),
                is_camera_off: None,
            }
        );
    }

    #[test]
    fn test_parse_leave_room_without_payload() {
        // テスト項目: leave-room はペイロードなしで読み取れる
        // when (操作):
        let event: ClientEvent = serde_json::from_str(r#"{"type":"leave-room"}"#).unwrap();

        // then (期待する結果):
        assert_eq!(event, ClientEvent::LeaveRoom);
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        // テスト項目: 未知のイベントはパースエラーになる
        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(r#"{"type":"explode"}"#);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_new_message_flattens_fields() {
        // テスト項目: new-message は type とメッセージのフィールドが同じ階層に並ぶ
        // given (前提条件):
        let event = ServerEvent::NewMessage(ChatMessageInfo {
            sender: "alice".to_string(),
            content: "🎉".to_string(),
            is_reaction: true,
            timestamp: "2023-01-01T00:00:00.000Z".to_string(),
        });

        // when (操作):
        let value = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({
                "type": "new-message",
                "sender": "alice",
                "content": "🎉",
                "isReaction": true,
                "timestamp": "2023-01-01T00:00:00.000Z",
            })
        );
    }

    #[test]
    fn test_serialize_user_updated_omits_missing_flags() {
        // テスト項目: user-updated は指定されなかったフラグを出力しない
        // given (前提条件):
        let event = ServerEvent::UserUpdated {
            connection_id: "c1".to_string(),
            is_muted: None,
            is_camera_off: Some(true),
        };

        // when (操作):
        let value = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({
                "type": "user-updated",
                "connectionId": "c1",
                "isCameraOff": true,
            })
        );
    }
}
