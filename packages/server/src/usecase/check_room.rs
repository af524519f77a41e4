//! UseCase: Room の状態確認（check-room / HTTP status）

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{RoomId, RoomRepository, RoomStatus, Timestamp};

use super::error::CheckRoomError;

/// Room 状態確認のユースケース
///
/// パスワードは不要なため、参加者数と表示名以外は返さない。
pub struct CheckRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl CheckRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 期限切れの Room・不正な ID は存在しないものとして扱う
    pub async fn execute(&self, room_id: String) -> Result<RoomStatus, CheckRoomError> {
        let Ok(room_id) = RoomId::new(room_id) else {
            return Ok(RoomStatus::NotFound);
        };
        let room = self
            .repository
            .find_room(&room_id)
            .await
            .map_err(|e| CheckRoomError::ServerError(e.to_string()))?;

        let status = match room {
            Some(room) if !room.is_expired(Timestamp::new(self.clock.now_millis())) => {
                RoomStatus::Open {
                    participant_count: room.active_count(),
                    name: room.name,
                }
            }
            _ => RoomStatus::NotFound,
        };
        Ok(status)
    }
}
