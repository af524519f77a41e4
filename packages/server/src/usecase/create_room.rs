//! UseCase: Room 作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - 有効時間のバリデーションと expires_at の算出
//!
//! ### どのような状況を想定しているか
//! - 正常系：1〜360 分の Room 作成
//! - 異常系：範囲外・未指定の有効時間（Room は保存されない）
//! - 異常系：ストレージ障害
//! - エッジケース：RoomId の衝突（再生成される）

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{
    RepositoryError, Room, RoomDuration, RoomIdFactory, RoomName, RoomPasswordFactory,
    RoomRepository, Timestamp,
};

use super::error::CreateRoomError;

/// RoomId が衝突したときの最大試行回数
const MAX_ID_ATTEMPTS: usize = 5;

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Room 作成を実行
    ///
    /// # Arguments
    ///
    /// * `duration_minutes` - 有効時間（分、1〜360）
    /// * `name` - Room の表示名（任意）
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 作成された Room（ID・パスワード・expires_at を含む）
    /// * `Err(CreateRoomError)` - 作成失敗（Room は保存されない）
    pub async fn execute(
        &self,
        duration_minutes: Option<i64>,
        name: Option<String>,
    ) -> Result<Room, CreateRoomError> {
        let duration = duration_minutes
            .ok_or(CreateRoomError::InvalidDuration)
            .and_then(|m| {
                RoomDuration::from_minutes(m).map_err(|_| CreateRoomError::InvalidDuration)
            })?;
        let name = name
            .filter(|n| !n.trim().is_empty())
            .map(RoomName::new)
            .transpose()
            .map_err(|e| CreateRoomError::InvalidName(e.to_string()))?;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let room_id =
                RoomIdFactory::generate().map_err(|e| CreateRoomError::ServerError(e.to_string()))?;
            let password = RoomPasswordFactory::generate()
                .map_err(|e| CreateRoomError::ServerError(e.to_string()))?;
            let created_at = Timestamp::new(self.clock.now_millis());
            let room = Room::new(room_id, password, name.clone(), created_at, duration);

            match self.repository.insert_room(room.clone()).await {
                Ok(()) => {
                    tracing::info!(
                        room_id = %room.id,
                        duration_minutes = duration.minutes(),
                        "Room created"
                    );
                    return Ok(room);
                }
                Err(RepositoryError::DuplicateRoom(id)) => {
                    tracing::warn!(room_id = %id, attempt, "RoomId collision, regenerating");
                }
                Err(e) => {
                    tracing::error!("Failed to store room: {}", e);
                    return Err(CreateRoomError::ServerError(e.to_string()));
                }
            }
        }

        Err(CreateRoomError::ServerError(
            "could not allocate a unique room id".to_string(),
        ))
    }
}
