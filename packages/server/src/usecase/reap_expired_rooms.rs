//! UseCase: 期限切れ Room の掃除
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ReapExpiredRoomsUseCase::execute() メソッド
//! - 期限切れ Room の削除と、残っていた参加者への room-expired 通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：期限切れの Room のみ削除される
//! - エッジケース：期限ちょうどの Room、掃除対象なし
//! - 異常系：一覧取得の失敗

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{ActivityLogRepository, MessagePusher, RoomEvent, RoomId, RoomRepository, Timestamp};

use super::{error::ReapError, room_lock::RoomLocks};

/// 期限切れ Room 掃除のユースケース
pub struct ReapExpiredRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    activity_log: Arc<dyn ActivityLogRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    locks: Arc<RoomLocks>,
    clock: Arc<dyn Clock>,
}

impl ReapExpiredRoomsUseCase {
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

    /// 期限切れの Room をすべて削除し、削除した Room の ID を返す
    ///
    /// 個々の Room の削除失敗はログに残して次回の掃除に回す。
    pub async fn execute(&self) -> Result<Vec<RoomId>, ReapError> {
        let now = Timestamp::new(self.clock.now_millis());
        let candidates = self
            .repository
            .find_expired_room_ids(now)
            .await
            .map_err(|e| ReapError::ServerError(e.to_string()))?;

        let mut reaped = Vec::with_capacity(candidates.len());
        for room_id in candidates {
            if self.reap_room(&room_id, now).await {
                reaped.push(room_id);
            }
        }

        if !reaped.is_empty() {
            tracing::info!(count = reaped.len(), "Expired rooms reaped");
        }
        Ok(reaped)
    }

    async fn reap_room(&self, room_id: &RoomId, now: Timestamp) -> bool {
        let guard = self.locks.acquire(room_id).await;

        let room = match self.repository.find_room(room_id).await {
            Ok(Some(room)) if room.is_expired(now) => room,
            Ok(Some(_)) => return false,
            Ok(None) => {
                drop(guard);
                self.locks.remove(room_id).await;
                return false;
            }
            Err(e) => {
                tracing::warn!(room_id = %room_id, "Failed to load expired room: {}", e);
                return false;
            }
        };

        let members = room.active_connection_ids();
        let event = RoomEvent::RoomExpired {
            room_id: room_id.clone(),
        };
        if let Err(e) = self.message_pusher.broadcast(members.clone(), &event).await {
            tracing::warn!(room_id = %room_id, "Failed to broadcast room-expired: {}", e);
        }
        for connection_id in &members {
            if let Err(e) = self.activity_log.close_entry(connection_id, now).await {
                tracing::warn!(connection_id = %connection_id, "Failed to close activity entry: {}", e);
            }
        }

        if let Err(e) = self.repository.delete_room(room_id).await {
            tracing::error!(room_id = %room_id, "Failed to delete expired room: {}", e);
            return false;
        }
        tracing::info!(room_id = %room_id, participants = members.len(), "Room expired");

        drop(guard);
        self.locks.remove(room_id).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ActivityLogEntry, MockRoomRepository, RepositoryError},
        usecase::test_support::{Fixture, NOW, ROOM_ID, conn, drain, event_types},
    };

    fn create_usecase(fixture: &Fixture) -> ReapExpiredRoomsUseCase {
        ReapExpiredRoomsUseCase::new(
            fixture.repository.clone(),
            fixture.activity.clone(),
            fixture.pusher.clone(),
            fixture.locks.clone(),
            fixture.clock.clone(),
        )
    }

    #[tokio::test]
    async fn test_reap_removes_only_expired_rooms() {
        // テスト項目: 期限切れの Room のみ削除され、有効な Room は残る
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.create_room(1).await;
        fixture.create_room_with_id("0badf00d", 10).await;
        fixture.clock.advance(5 * 60_000);

        // when (操作):
        let reaped = create_usecase(&fixture).execute().await.unwrap();

        // then (期待する結果):
        assert_eq!(reaped, vec![RoomId::new(ROOM_ID.to_string()).unwrap()]);
        assert!(fixture.room(ROOM_ID).await.is_none());
        assert!(fixture.room("0badf00d").await.is_some());
    }

    #[tokio::test]
    async fn test_reap_notifies_members_and_closes_activity() {
        // テスト項目: 残っていた参加者に room-expired が届き、入退室ログが閉じられる
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.create_room(1).await;
        fixture.seed_participant(ROOM_ID, "alice", "c-alice").await;
        let (_alice, mut alice_rx) = fixture.connect("c-alice").await;
        fixture
            .activity
            .open_entry(ActivityLogEntry::open(
                conn("c-alice"),
                RoomId::new(ROOM_ID.to_string()).unwrap(),
                None,
                Timestamp::new(NOW),
            ))
            .await
            .unwrap();
        let room_id = RoomId::new(ROOM_ID.to_string()).unwrap();
        // ロックのエントリを作っておく
        drop(fixture.locks.acquire(&room_id).await);
        fixture.clock.advance(60_000);

        // when (操作):
        create_usecase(&fixture).execute().await.unwrap();

        // then (期待する結果):
        let frames = drain(&mut alice_rx);
        assert_eq!(event_types(&frames), vec!["room-expired"]);
        assert_eq!(frames[0]["roomId"], ROOM_ID);

        let entries = fixture.activity.list_entries(None).await.unwrap();
        assert_eq!(entries[0].left_at, Some(Timestamp::new(NOW + 60_000)));
        assert!(fixture.locks.is_empty().await);
    }

    #[tokio::test]
    async fn test_reap_with_nothing_expired() {
        // テスト項目: 期限切れの Room がなければ何もしない
        // given (前提条件):
        let fixture = Fixture::new();
        let room = fixture.create_room(1).await;
        fixture.clock.set(room.expires_at.value() - 1);

        // when (操作):
        let reaped = create_usecase(&fixture).execute().await.unwrap();

        // then (期待する結果):
        assert!(reaped.is_empty());
        assert!(fixture.room(ROOM_ID).await.is_some());
    }

    #[tokio::test]
    async fn test_reap_at_exact_expiry() {
        // テスト項目: 期限ちょうどの Room は削除対象
        // given (前提条件):
        let fixture = Fixture::new();
        let room = fixture.create_room(1).await;
        fixture.clock.set(room.expires_at.value());

        // when (操作):
        let reaped = create_usecase(&fixture).execute().await.unwrap();

        // then (期待する結果):
        assert_eq!(reaped.len(), 1);
    }

    #[tokio::test]
    async fn test_reap_listing_failure() {
        // テスト項目: 一覧取得に失敗した場合は ServerError
        // given (前提条件):
        let fixture = Fixture::new();
        let mut repository = MockRoomRepository::new();
        repository
            .expect_find_expired_room_ids()
            .returning(|_| Err(RepositoryError::Storage("unavailable".to_string())));
        let usecase = ReapExpiredRoomsUseCase::new(
            Arc::new(repository),
            fixture.activity.clone(),
            fixture.pusher.clone(),
            fixture.locks.clone(),
            fixture.clock.clone(),
        );

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert!(matches!(result, Err(ReapError::ServerError(_))));
    }
}
