//! UseCase: 退出処理（明示的な退出・切断の両方）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - left_at の記録、残りの参加者への通知、入退室ログのクローズ
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出と通知
//! - エッジケース：最後の参加者の退出（通知対象なし）
//! - エッジケース：未入室の接続の退出（何もしない）

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{
    ActivityLogRepository, ConnectionId, MessagePusher, Participant, RoomEvent, RoomRepository,
    Timestamp,
};

use super::{error::LeaveRoomError, room_lock::RoomLocks};

/// 退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    activity_log: Arc<dyn ActivityLogRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    locks: Arc<RoomLocks>,
    clock: Arc<dyn Clock>,
}

impl LeaveRoomUseCase {
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

    /// 退出を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Participant))` - 退出した参加者
    /// * `Ok(None)` - 接続にバインドされたアクティブな参加者がいない（冪等）
    /// * `Err(LeaveRoomError)` - 保存失敗（通知は行われない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Participant>, LeaveRoomError> {
        let left = self.leave_room(connection_id).await;
        if !matches!(left, Ok(Some(_))) {
            self.close_activity(connection_id).await;
        }
        left
    }

    async fn leave_room(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Participant>, LeaveRoomError> {
        let Some(room_id) = self
            .repository
            .find_room_id_by_connection(connection_id)
            .await
            .map_err(|e| LeaveRoomError::ServerError(e.to_string()))?
        else {
            return Ok(None);
        };

        let _guard = self.locks.acquire(&room_id).await;
        let Some(mut room) = self
            .repository
            .find_room(&room_id)
            .await
            .map_err(|e| LeaveRoomError::ServerError(e.to_string()))?
        else {
            return Ok(None);
        };

        let now = Timestamp::new(self.clock.now_millis());
        // 期限切れの Room は掃除を待つだけなので変更しない
        if room.is_expired(now) {
            return Ok(None);
        }
        let Some(participant) = room.leave(connection_id, now) else {
            return Ok(None);
        };

        self.repository.save_room(room.clone()).await.map_err(|e| {
            tracing::error!(room_id = %room_id, "Failed to persist leave: {}", e);
            LeaveRoomError::ServerError(e.to_string())
        })?;

        tracing::info!(
            room_id = %room_id,
            connection_id = %connection_id,
            name = participant.name.as_str(),
            "Participant left"
        );
        self.close_activity(connection_id).await;

        let event = RoomEvent::UserDisconnected {
            connection_id: connection_id.clone(),
            name: participant.name.clone(),
        };
        if let Err(e) = self
            .message_pusher
            .broadcast(room.active_connection_ids(), &event)
            .await
        {
            tracing::warn!(room_id = %room_id, "Failed to broadcast user-disconnected: {}", e);
        }

        Ok(Some(participant))
    }

    async fn close_activity(&self, connection_id: &ConnectionId) {
        let now = Timestamp::new(self.clock.now_millis());
        if let Err(e) = self.activity_log.close_entry(connection_id, now).await {
            tracing::warn!(connection_id = %connection_id, "Failed to close activity entry: {}", e);
        }
    }
}
