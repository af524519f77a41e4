//! サーバーからクライアントへ通知するイベント
//!
//! UseCase はこの型で通知内容を表現し、ワイヤーフォーマットへの変換は
//! Infrastructure 層（DTO）が担当します。

use super::{
    entity::{ChatMessage, ParticipantView, RoomSnapshot},
    value_object::{ConnectionId, ParticipantName, RoomId, RoomName, SignalPayload},
};

#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// 接続直後に払い出された ConnectionId の通知
    Connected { connection_id: ConnectionId },
    /// 入室直後のスナップショット（入室者のみ）
    RoomDetails(RoomSnapshot),
    /// 入室失敗（入室を試みた接続のみ）
    JoinError { reason: String },
    UserConnected(ParticipantView),
    UserDisconnected {
        connection_id: ConnectionId,
        name: ParticipantName,
    },
    Signal {
        from: ConnectionId,
        payload: SignalPayload,
    },
    NewMessage(ChatMessage),
    /// メッセージ送信失敗（送信者のみ）
    MessageError { reason: String },
    UserUpdated {
        connection_id: ConnectionId,
        is_muted: Option<bool>,
        is_camera_off: Option<bool>,
    },
    /// check-room への応答
    RoomStatus {
        request_id: Option<String>,
        status: RoomStatus,
    },
    RoomExpired { room_id: RoomId },
}

/// check-room の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomStatus {
    NotFound,
    Open {
        participant_count: usize,
        name: Option<RoomName>,
    },
}

impl RoomStatus {
    pub fn exists(&self) -> bool {
        matches!(self, RoomStatus::Open { .. })
    }
}
