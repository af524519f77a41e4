//! UseCase: ピア間シグナリングの中継
//!
//! ペイロードの中身は解釈せず、宛先の接続へそのまま転送します。
//! 中継できない場合は送信者に通知せず破棄します。

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, RoomEvent, RoomRepository, SignalPayload, Timestamp};

/// 中継しなかった理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    SenderNotJoined,
    RoomExpired,
    TargetNotInRoom,
    TargetUnreachable,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered,
    Dropped(DropReason),
}

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RelaySignalUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 送信者と宛先が同じ有効な Room のアクティブな参加者である場合のみ中継する
    pub async fn execute(
        &self,
        from: &ConnectionId,
        to: &ConnectionId,
        payload: SignalPayload,
    ) -> RelayOutcome {
        let outcome = self.relay(from, to, payload).await;
        if let RelayOutcome::Dropped(reason) = outcome {
            tracing::debug!(from = %from, to = %to, ?reason, "Signal dropped");
        }
        outcome
    }

    async fn relay(
        &self,
        from: &ConnectionId,
        to: &ConnectionId,
        payload: SignalPayload,
    ) -> RelayOutcome {
        let room_id = match self.repository.find_room_id_by_connection(from).await {
            Ok(Some(room_id)) => room_id,
            Ok(None) => return RelayOutcome::Dropped(DropReason::SenderNotJoined),
            Err(e) => {
                tracing::warn!("Failed to resolve signal sender: {}", e);
                return RelayOutcome::Dropped(DropReason::Storage);
            }
        };
        let room = match self.repository.find_room(&room_id).await {
            Ok(Some(room)) => room,
            Ok(None) => return RelayOutcome::Dropped(DropReason::SenderNotJoined),
            Err(e) => {
                tracing::warn!(room_id = %room_id, "Failed to load room for signal: {}", e);
                return RelayOutcome::Dropped(DropReason::Storage);
            }
        };

        if room.is_expired(Timestamp::new(self.clock.now_millis())) {
            return RelayOutcome::Dropped(DropReason::RoomExpired);
        }
        if room.find_active_by_connection(to).is_none() {
            return RelayOutcome::Dropped(DropReason::TargetNotInRoom);
        }
        // 受信側が閉じた接続には送らない
        if !self.message_pusher.is_connected(to).await {
            return RelayOutcome::Dropped(DropReason::TargetUnreachable);
        }

        let event = RoomEvent::Signal {
            from: from.clone(),
            payload,
        };
        match self.message_pusher.push_to(to, &event).await {
            Ok(()) => RelayOutcome::Delivered,
            Err(_) => RelayOutcome::Dropped(DropReason::TargetUnreachable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockMessagePusher, MockRoomRepository, RepositoryError},
        usecase::test_support::{Fixture, ROOM_ID, conn, drain, event_types},
    };
    use serde_json::json;

    fn create_usecase(fixture: &Fixture) -> RelaySignalUseCase {
        RelaySignalUseCase::new(
            fixture.repository.clone(),
            fixture.pusher.clone(),
            fixture.clock.clone(),
        )
    }

    fn offer() -> SignalPayload {
        SignalPayload::new(json!({"type": "offer", "sdp": "v=0"})).unwrap()
    }

    #[tokio::test]
    async fn test_relay_delivers_payload_verbatim() {
        // テスト項目: 同じ Room の参加者へペイロードがそのまま届き、from に送信者が入る
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.create_room(5).await;
        fixture.seed_participant(ROOM_ID, "alice", "c-alice").await;
        fixture.seed_participant(ROOM_ID, "bob", "c-bob").await;
        let (_alice, mut alice_rx) = fixture.connect("c-alice").await;
        let (_bob, mut bob_rx) = fixture.connect("c-bob").await;

        // when (操作):
        let outcome = create_usecase(&fixture)
            .execute(&conn("c-alice"), &conn("c-bob"), offer())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RelayOutcome::Delivered);
        let frames = drain(&mut bob_rx);
        assert_eq!(event_types(&frames), vec!["signal"]);
        assert_eq!(frames[0]["from"], "c-alice");
        assert_eq!(frames[0]["payload"], json!({"type": "offer", "sdp": "v=0"}));
        assert!(drain(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_relay_across_rooms_is_dropped() {
        // テスト項目: 別の Room の接続には中継されない
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.create_room(5).await;
        fixture.create_room_with_id("0badf00d", 5).await;
        fixture.seed_participant(ROOM_ID, "alice", "c-alice").await;
        fixture.seed_participant("0badf00d", "mallory", "c-mallory").await;
        let (_mallory, mut mallory_rx) = fixture.connect("c-mallory").await;

        // when (操作):
        let outcome = create_usecase(&fixture)
            .execute(&conn("c-alice"), &conn("c-mallory"), offer())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RelayOutcome::Dropped(DropReason::TargetNotInRoom));
        assert!(drain(&mut mallory_rx).is_empty());
    }

    #[tokio::test]
    async fn test_relay_from_non_member_is_dropped() {
        // テスト項目: 未入室の接続からのシグナルは破棄される
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.create_room(5).await;
        fixture.seed_participant(ROOM_ID, "bob", "c-bob").await;
        let (_bob, mut bob_rx) = fixture.connect("c-bob").await;

        // when (操作):
        let outcome = create_usecase(&fixture)
            .execute(&conn("c-stranger"), &conn("c-bob"), offer())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RelayOutcome::Dropped(DropReason::SenderNotJoined));
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_relay_to_disconnected_target_is_dropped() {
        // テスト項目: 宛先が Room にいても接続が無ければ破棄される
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.create_room(5).await;
        fixture.seed_participant(ROOM_ID, "alice", "c-alice").await;
        fixture.seed_participant(ROOM_ID, "bob", "c-bob").await;

        // when (操作):
        let outcome = create_usecase(&fixture)
            .execute(&conn("c-alice"), &conn("c-bob"), offer())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RelayOutcome::Dropped(DropReason::TargetUnreachable));
    }

    #[tokio::test]
    async fn test_relay_to_closed_target_is_dropped() {
        // テスト項目: 宛先の受信側が閉じていれば送信せずに破棄される
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.create_room(5).await;
        fixture.seed_participant(ROOM_ID, "alice", "c-alice").await;
        fixture.seed_participant(ROOM_ID, "bob", "c-bob").await;
        let (_bob, bob_rx) = fixture.connect("c-bob").await;
        drop(bob_rx);

        // when (操作):
        let outcome = create_usecase(&fixture)
            .execute(&conn("c-alice"), &conn("c-bob"), offer())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RelayOutcome::Dropped(DropReason::TargetUnreachable));
    }

    #[tokio::test]
    async fn test_relay_checks_reachability_before_pushing() {
        // テスト項目: 到達不能と判定された宛先には push_to が呼ばれない
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.create_room(5).await;
        fixture.seed_participant(ROOM_ID, "alice", "c-alice").await;
        fixture.seed_participant(ROOM_ID, "bob", "c-bob").await;
        let mut pusher = MockMessagePusher::new();
        pusher.expect_is_connected().times(1).returning(|_| false);
        pusher.expect_push_to().never();
        let usecase = RelaySignalUseCase::new(
            fixture.repository.clone(),
            Arc::new(pusher),
            fixture.clock.clone(),
        );

        // when (操作):
        let outcome = usecase
            .execute(&conn("c-alice"), &conn("c-bob"), offer())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RelayOutcome::Dropped(DropReason::TargetUnreachable));
    }

    #[tokio::test]
    async fn test_relay_in_expired_room_is_dropped() {
        // テスト項目: 期限切れの Room では中継されない
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.create_room(1).await;
        fixture.seed_participant(ROOM_ID, "alice", "c-alice").await;
        fixture.seed_participant(ROOM_ID, "bob", "c-bob").await;
        let (_bob, mut bob_rx) = fixture.connect("c-bob").await;
        fixture.clock.advance(60_000);

        // when (操作):
        let outcome = create_usecase(&fixture)
            .execute(&conn("c-alice"), &conn("c-bob"), offer())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RelayOutcome::Dropped(DropReason::RoomExpired));
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_relay_storage_failure_is_dropped() {
        // テスト項目: ストレージ障害時は破棄される
        // given (前提条件):
        let fixture = Fixture::new();
        let mut repository = MockRoomRepository::new();
        repository
            .expect_find_room_id_by_connection()
            .returning(|_| Err(RepositoryError::Storage("unavailable".to_string())));
        let usecase = RelaySignalUseCase::new(
            Arc::new(repository),
            fixture.pusher.clone(),
            fixture.clock.clone(),
        );

        // when (操作):
        let outcome = usecase
            .execute(&conn("c-alice"), &conn("c-bob"), offer())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RelayOutcome::Dropped(DropReason::Storage));
    }
}
