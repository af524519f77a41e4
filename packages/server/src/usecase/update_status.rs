//! UseCase: ステータス（ミュート・カメラ）更新処理

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, ParticipantView, RoomError, RoomEvent, RoomId, RoomRepository,
    Timestamp,
};

use super::{error::UpdateStatusError, room_lock::RoomLocks};

/// ステータス更新のユースケース
pub struct UpdateStatusUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    locks: Arc<RoomLocks>,
    clock: Arc<dyn Clock>,
}

impl UpdateStatusUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        locks: Arc<RoomLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            locks,
            clock,
        }
    }

    /// ステータス更新を実行（指定されたフラグのみ変更）
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ParticipantView))` - 更新後の参加者
    /// * `Ok(None)` - 接続がこの Room のアクティブな参加者でない、または変更がない
    /// * `Err(UpdateStatusError)` - 期限切れ・保存失敗（通知は行われない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: String,
        is_muted: Option<bool>,
        is_camera_off: Option<bool>,
    ) -> Result<Option<ParticipantView>, UpdateStatusError> {
        if is_muted.is_none() && is_camera_off.is_none() {
            return Ok(None);
        }
        let Ok(room_id) = RoomId::new(room_id) else {
            return Ok(None);
        };
        let exists = self
            .repository
            .find_room(&room_id)
            .await
            .map_err(|e| UpdateStatusError::ServerError(e.to_string()))?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let _guard = self.locks.acquire(&room_id).await;
        let Some(mut room) = self
            .repository
            .find_room(&room_id)
            .await
            .map_err(|e| UpdateStatusError::ServerError(e.to_string()))?
        else {
            return Ok(None);
        };
        if room.is_expired(Timestamp::new(self.clock.now_millis())) {
            return Err(UpdateStatusError::Expired);
        }

        let participant = match room.update_status(connection_id, is_muted, is_camera_off) {
            Ok(participant) => participant,
            Err(RoomError::NotActive(_)) => return Ok(None),
            Err(e) => return Err(UpdateStatusError::ServerError(e.to_string())),
        };

        self.repository.save_room(room.clone()).await.map_err(|e| {
            tracing::error!(room_id = %room_id, "Failed to persist status update: {}", e);
            UpdateStatusError::ServerError(e.to_string())
        })?;

        tracing::debug!(
            room_id = %room_id,
            connection_id = %connection_id,
            ?is_muted,
            ?is_camera_off,
            "Participant status updated"
        );

        let others: Vec<ConnectionId> = room
            .active_connection_ids()
            .into_iter()
            .filter(|id| id != connection_id)
            .collect();
        let event = RoomEvent::UserUpdated {
            connection_id: connection_id.clone(),
            is_muted,
            is_camera_off,
        };
        if let Err(e) = self.message_pusher.broadcast(others, &event).await {
            tracing::warn!(room_id = %room_id, "Failed to broadcast user-updated: {}", e);
        }

        Ok(Some(participant))
    }
}
