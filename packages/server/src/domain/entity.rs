//! Entities
//!
//! Room を集約ルートとし、参加者とメッセージ履歴は Room を通してのみ変更します。

use std::net::SocketAddr;

use super::{
    error::RoomError,
    value_object::{
        ConnectionId, MessageContent, ParticipantName, RoomDuration, RoomId, RoomName,
        RoomPassword, Timestamp,
    },
};

/// 参加者の在室状態
///
/// 遷移: join → Active, leave / disconnect → Left, rejoin(Left, 同名) → Active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Active,
    Left { left_at: Timestamp },
}

/// Room の参加者
///
/// 退出しても削除されず、`Presence::Left` として履歴に残る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: ParticipantName,
    /// 現在（または最後）にバインドされている接続
    pub connection_id: ConnectionId,
    pub joined_at: Timestamp,
    pub presence: Presence,
    pub is_muted: bool,
    pub is_camera_off: bool,
}

impl Participant {
    pub fn new(name: ParticipantName, connection_id: ConnectionId, joined_at: Timestamp) -> Self {
        Self {
            name,
            connection_id,
            joined_at,
            presence: Presence::Active,
            is_muted: false,
            is_camera_off: false,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.presence, Presence::Active)
    }

    pub fn left_at(&self) -> Option<Timestamp> {
        match self.presence {
            Presence::Active => None,
            Presence::Left { left_at } => Some(left_at),
        }
    }

    /// 別の接続で再入室する（ステータスフラグは保持する）
    fn reactivate(&mut self, connection_id: ConnectionId) {
        self.connection_id = connection_id;
        self.presence = Presence::Active;
    }

    fn mark_left(&mut self, left_at: Timestamp) {
        self.presence = Presence::Left { left_at };
    }
}

/// チャットメッセージ（リアクションを含む）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: ParticipantName,
    pub content: MessageContent,
    pub is_reaction: bool,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(
        sender: ParticipantName,
        content: MessageContent,
        is_reaction: bool,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            sender,
            content,
            is_reaction,
            timestamp,
        }
    }
}

/// 接続単位の入退室記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLogEntry {
    pub connection_id: ConnectionId,
    pub room_id: RoomId,
    pub source_address: Option<SocketAddr>,
    pub joined_at: Timestamp,
    pub left_at: Option<Timestamp>,
}

impl ActivityLogEntry {
    pub fn open(
        connection_id: ConnectionId,
        room_id: RoomId,
        source_address: Option<SocketAddr>,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            room_id,
            source_address,
            joined_at,
            left_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.left_at.is_none()
    }
}

/// 参加者の公開情報（他の参加者に見せてよいフィールドのみ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantView {
    pub connection_id: ConnectionId,
    pub name: ParticipantName,
    pub is_muted: bool,
    pub is_camera_off: bool,
}

impl From<&Participant> for ParticipantView {
    fn from(participant: &Participant) -> Self {
        Self {
            connection_id: participant.connection_id.clone(),
            name: participant.name.clone(),
            is_muted: participant.is_muted,
            is_camera_off: participant.is_camera_off,
        }
    }
}

/// 入室直後に参加者へ送る Room のスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub name: Option<RoomName>,
    pub expires_at: Timestamp,
    /// アクティブな参加者のみ
    pub participants: Vec<ParticipantView>,
    pub messages: Vec<ChatMessage>,
}

/// join の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub participant: ParticipantView,
    /// 既存の参加者レコードを再利用したか
    pub rejoined: bool,
    /// 同じ接続に別名でバインドされていたため退出させた参加者
    pub replaced: Option<Participant>,
}

/// Room（集約ルート）
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub password: RoomPassword,
    pub name: Option<RoomName>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub participants: Vec<Participant>,
    pub messages: Vec<ChatMessage>,
}

impl Room {
    /// 新しい Room を作成（`expires_at = created_at + duration`）
    pub fn new(
        id: RoomId,
        password: RoomPassword,
        name: Option<RoomName>,
        created_at: Timestamp,
        duration: RoomDuration,
    ) -> Self {
        Self {
            id,
            password,
            name,
            created_at,
            expires_at: created_at.add_millis(duration.as_millis()),
            participants: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// `now >= expires_at` なら期限切れ（猶予なし）
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    pub fn ensure_not_expired(&self, now: Timestamp) -> Result<(), RoomError> {
        if self.is_expired(now) {
            return Err(RoomError::Expired);
        }
        Ok(())
    }

    pub fn active_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active_participants().count()
    }

    pub fn active_connection_ids(&self) -> Vec<ConnectionId> {
        self.active_participants()
            .map(|p| p.connection_id.clone())
            .collect()
    }

    pub fn find_active_by_connection(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.active_participants()
            .find(|p| &p.connection_id == connection_id)
    }

    /// 参加者を入室させる
    ///
    /// 同名の参加者レコードがあれば再利用し、なければ末尾に追加する。
    /// 同名のアクティブな参加者が別の接続にバインドされている場合は `NameTaken`。
    /// 1 接続につきアクティブな参加者は 1 人までなので、同じ接続が別名で入室していれば
    /// その参加者は退出扱いになり `JoinOutcome::replaced` で返る。
    pub fn join(
        &mut self,
        name: ParticipantName,
        connection_id: ConnectionId,
        now: Timestamp,
    ) -> Result<JoinOutcome, RoomError> {
        self.ensure_not_expired(now)?;

        let taken = self
            .active_participants()
            .any(|p| p.name == name && p.connection_id != connection_id);
        if taken {
            return Err(RoomError::NameTaken(name.into_string()));
        }

        let replaced = self
            .participants
            .iter_mut()
            .find(|p| p.is_active() && p.connection_id == connection_id && p.name != name)
            .map(|previous| {
                previous.mark_left(now);
                previous.clone()
            });

        if let Some(existing) = self.participants.iter_mut().find(|p| p.name == name) {
            existing.reactivate(connection_id);
            return Ok(JoinOutcome {
                participant: ParticipantView::from(&*existing),
                rejoined: true,
                replaced,
            });
        }

        let participant = Participant::new(name, connection_id, now);
        let view = ParticipantView::from(&participant);
        self.participants.push(participant);
        Ok(JoinOutcome {
            participant: view,
            rejoined: false,
            replaced,
        })
    }

    /// 接続にバインドされたアクティブな参加者を退出させる
    ///
    /// 該当する参加者がいなければ `None`（冪等）。
    pub fn leave(&mut self, connection_id: &ConnectionId, now: Timestamp) -> Option<Participant> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.is_active() && &p.connection_id == connection_id)?;
        participant.mark_left(now);
        Some(participant.clone())
    }

    /// ステータスフラグを部分更新する（指定されたフィールドのみ変更）
    pub fn update_status(
        &mut self,
        connection_id: &ConnectionId,
        is_muted: Option<bool>,
        is_camera_off: Option<bool>,
    ) -> Result<ParticipantView, RoomError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.is_active() && &p.connection_id == connection_id)
            .ok_or_else(|| RoomError::NotActive(connection_id.as_str().to_string()))?;
        if let Some(is_muted) = is_muted {
            participant.is_muted = is_muted;
        }
        if let Some(is_camera_off) = is_camera_off {
            participant.is_camera_off = is_camera_off;
        }
        Ok(ParticipantView::from(&*participant))
    }

    /// メッセージ履歴に追加する（追加順 = 表示順）
    pub fn append_message(&mut self, message: ChatMessage, now: Timestamp) -> Result<(), RoomError> {
        self.ensure_not_expired(now)?;
        self.messages.push(message);
        Ok(())
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id.clone(),
            name: self.name.clone(),
            expires_at: self.expires_at,
            participants: self.active_participants().map(ParticipantView::from).collect(),
            messages: self.messages.clone(),
        }
    }
}
