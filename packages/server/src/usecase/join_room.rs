//! UseCase: 入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 入室の可否判定（ID・パスワード、期限、名前の重複）
//! - 再入室時の参加者レコード再利用
//! - 入室時の通知（user-connected / room-details）と入退室ログ
//!
//! ### なぜこのテストが必要か
//! - 入室は Room の状態を変更する最も複雑な操作
//! - 同名での同時入室が両方成功すると名前の一意性が崩れる
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規入室、退出後の再入室
//! - 異常系：パスワード不一致、期限切れ、名前の重複、ストレージ障害
//! - エッジケース：期限ちょうどの入室、同名での同時入室

use std::{net::SocketAddr, sync::Arc};

use focusroom_shared::time::Clock;

use crate::domain::{
    ActivityLogEntry, ActivityLogRepository, ConnectionId, MessagePusher, ParticipantName,
    RoomError, RoomEvent, RoomId, RoomRepository, RoomSnapshot, Timestamp,
};

use super::{error::JoinRoomError, room_lock::RoomLocks};

/// 入室リクエスト
#[derive(Debug, Clone)]
pub struct JoinRoomCommand {
    pub room_id: String,
    pub name: String,
    pub password: String,
    pub connection_id: ConnectionId,
    pub source_address: Option<SocketAddr>,
}

/// 入室のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    activity_log: Arc<dyn ActivityLogRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    locks: Arc<RoomLocks>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        activity_log: Arc<dyn ActivityLogRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        locks: Arc<RoomLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            activity_log,
            message_pusher,
            locks,
            clock,
        }
    }

    /// 入室を実行
    ///
    /// Room のロックを保持したまま「保存 → 入退室ログ → 他の参加者へ user-connected →
    /// 入室者へ room-details」の順に処理するため、入室者が受け取るスナップショットには
    /// 自分自身が含まれる。
    ///
    /// 同じ接続が別名で入室済みだった場合、以前の参加者は退出扱いとなり、
    /// user-connected の前に他の参加者へ user-disconnected が送られる。
    ///
    /// # Returns
    ///
    /// * `Ok(RoomSnapshot)` - 入室後の Room のスナップショット
    /// * `Err(JoinRoomError)` - 入室失敗（Room は変更されず、通知も行われない）
    pub async fn execute(&self, command: JoinRoomCommand) -> Result<RoomSnapshot, JoinRoomError> {
        let JoinRoomCommand {
            room_id,
            name,
            password,
            connection_id,
            source_address,
        } = command;

        let name =
            ParticipantName::new(name).map_err(|e| JoinRoomError::Validation(e.to_string()))?;
        let Ok(room_id) = RoomId::new(room_id) else {
            return Err(JoinRoomError::NotFound);
        };

        // 存在しない Room のロックは作らない
        self.find_room_id(&room_id).await?;
        let _guard = self.locks.acquire(&room_id).await;

        let mut room = self
            .repository
            .find_room(&room_id)
            .await
            .map_err(|e| JoinRoomError::ServerError(e.to_string()))?
            .ok_or(JoinRoomError::NotFound)?;

        let now = Timestamp::new(self.clock.now_millis());
        if room.is_expired(now) {
            return Err(JoinRoomError::Expired);
        }
        if !room.password.matches(&password) {
            return Err(JoinRoomError::NotFound);
        }

        let outcome = room
            .join(name, connection_id.clone(), now)
            .map_err(|e| match e {
                RoomError::Expired => JoinRoomError::Expired,
                RoomError::NameTaken(name) => JoinRoomError::NameTaken(name),
                RoomError::NotActive(id) => JoinRoomError::ServerError(id),
            })?;

        self.repository.save_room(room.clone()).await.map_err(|e| {
            tracing::error!(room_id = %room_id, "Failed to persist join: {}", e);
            JoinRoomError::ServerError(e.to_string())
        })?;

        tracing::info!(
            room_id = %room_id,
            connection_id = %connection_id,
            name = outcome.participant.name.as_str(),
            rejoined = outcome.rejoined,
            "Participant joined"
        );

        let entry = ActivityLogEntry::open(
            connection_id.clone(),
            room_id.clone(),
            source_address,
            now,
        );
        if let Err(e) = self.activity_log.open_entry(entry).await {
            tracing::warn!(room_id = %room_id, "Failed to record activity entry: {}", e);
        }

        let others: Vec<ConnectionId> = room
            .active_connection_ids()
            .into_iter()
            .filter(|id| id != &connection_id)
            .collect();
        if let Some(previous) = outcome.replaced {
            tracing::info!(
                room_id = %room_id,
                connection_id = %connection_id,
                name = previous.name.as_str(),
                "Participant replaced by a join under another name"
            );
            let event = RoomEvent::UserDisconnected {
                connection_id: connection_id.clone(),
                name: previous.name,
            };
            if let Err(e) = self.message_pusher.broadcast(others.clone(), &event).await {
                tracing::warn!(room_id = %room_id, "Failed to broadcast user-disconnected: {}", e);
            }
        }
        if let Err(e) = self
            .message_pusher
            .broadcast(others, &RoomEvent::UserConnected(outcome.participant))
            .await
        {
            tracing::warn!(room_id = %room_id, "Failed to broadcast user-connected: {}", e);
        }

        let snapshot = room.snapshot();
        if let Err(e) = self
            .message_pusher
            .push_to(&connection_id, &RoomEvent::RoomDetails(snapshot.clone()))
            .await
        {
            tracing::warn!(connection_id = %connection_id, "Failed to send room-details: {}", e);
        }

        Ok(snapshot)
    }

    async fn find_room_id(&self, room_id: &RoomId) -> Result<(), JoinRoomError> {
        match self.repository.find_room(room_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(JoinRoomError::NotFound),
            Err(e) => Err(JoinRoomError::ServerError(e.to_string())),
        }
    }
}
