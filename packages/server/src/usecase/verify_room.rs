//! UseCase: Room の ID・パスワード確認（入室前の HTTP チェック）

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{RoomId, RoomRepository, Timestamp};

use super::error::VerifyRoomError;

/// Room の ID・パスワード確認のユースケース
pub struct VerifyRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl VerifyRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// ID とパスワードが一致する有効な Room があるか確認
    ///
    /// 存在しない Room とパスワード不一致はどちらも `NotFound`。
    pub async fn execute(&self, room_id: String, password: String) -> Result<(), VerifyRoomError> {
        let Ok(room_id) = RoomId::new(room_id) else {
            return Err(VerifyRoomError::NotFound);
        };
        let room = self
            .repository
            .find_room(&room_id)
            .await
            .map_err(|e| VerifyRoomError::ServerError(e.to_string()))?
            .ok_or(VerifyRoomError::NotFound)?;

        if room.is_expired(Timestamp::new(self.clock.now_millis())) {
            return Err(VerifyRoomError::Expired);
        }
        if !room.password.matches(&password) {
            return Err(VerifyRoomError::NotFound);
        }
        Ok(())
    }
}
