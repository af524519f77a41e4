//! UseCase テスト用のフィクスチャ

use std::{collections::HashMap, sync::Arc};

use focusroom_shared::time::ManualClock;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        ConnectionId, MessagePusher, ParticipantName, Room, RoomDuration, RoomId, RoomPassword,
        RoomRepository, Timestamp,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryActivityLogRepository, InMemoryRoomRepository},
    },
};

use super::room_lock::RoomLocks;

pub const NOW: i64 = 1_700_000_000_000;
pub const ROOM_ID: &str = "a1b2c3d4";
pub const PASSWORD: &str = "c0ffee";

/// 実装（InMemory Repository + WebSocketMessagePusher）を組み合わせたテスト環境
pub struct Fixture {
    pub repository: Arc<InMemoryRoomRepository>,
    pub activity: Arc<InMemoryActivityLogRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub locks: Arc<RoomLocks>,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryRoomRepository::default()),
            activity: Arc::new(InMemoryActivityLogRepository::default()),
            pusher: Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
                HashMap::new(),
            )))),
            locks: Arc::new(RoomLocks::new()),
            clock: Arc::new(ManualClock::new(NOW)),
        }
    }

    /// `ROOM_ID` / `PASSWORD` の Room を作成して保存
    pub async fn create_room(&self, duration_minutes: i64) -> Room {
        self.create_room_with_id(ROOM_ID, duration_minutes).await
    }

    pub async fn create_room_with_id(&self, room_id: &str, duration_minutes: i64) -> Room {
        let room = Room::new(
            RoomId::new(room_id.to_string()).unwrap(),
            RoomPassword::new(PASSWORD.to_string()).unwrap(),
            None,
            Timestamp::new(NOW),
            RoomDuration::from_minutes(duration_minutes).unwrap(),
        );
        self.repository.insert_room(room.clone()).await.unwrap();
        room
    }

    /// 接続を MessagePusher に登録し、受信側を返す
    pub async fn connect(&self, connection: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection_id = conn(connection);
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_client(connection_id.clone(), tx).await;
        (connection_id, rx)
    }

    /// Repository 上の Room を直接変更して参加者を入室させる（UseCase を通さない前提条件用）
    pub async fn seed_participant(&self, room_id: &str, name: &str, connection: &str) {
        let id = RoomId::new(room_id.to_string()).unwrap();
        let mut room = self.repository.find_room(&id).await.unwrap().unwrap();
        room.join(
            ParticipantName::new(name.to_string()).unwrap(),
            conn(connection),
            Timestamp::new(NOW),
        )
        .unwrap();
        self.repository.save_room(room).await.unwrap();
    }

    pub async fn room(&self, room_id: &str) -> Option<Room> {
        self.repository
            .find_room(&RoomId::new(room_id.to_string()).unwrap())
            .await
            .unwrap()
    }
}

pub fn conn(value: &str) -> ConnectionId {
    ConnectionId::new(value.to_string()).unwrap()
}

/// 受信済みのフレームをすべて取り出して JSON として返す
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}

/// 受信済みフレームの `type` 一覧
pub fn event_types(frames: &[serde_json::Value]) -> Vec<String> {
    frames
        .iter()
        .map(|f| f["type"].as_str().unwrap_or_default().to_string())
        .collect()
}
