//! Room 単位の排他制御
//!
//! 同じ Room への read-modify-write（入室・退出・ステータス更新・メッセージ追加・掃除）を
//! 直列化し、名前の一意性と再入室の冪等性を並行実行下でも保証します。
//! 異なる Room の操作は互いにブロックしません。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::RoomId;

/// RoomId ごとの非同期 Mutex のレジストリ
#[derive(Default)]
pub struct RoomLocks {
    locks: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Room のロックを取得（ガードを drop するまで保持）
    pub async fn acquire(&self, room_id: &RoomId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(room_id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// 削除された Room のロックを破棄
    pub async fn remove(&self, room_id: &RoomId) {
        self.locks.lock().await.remove(room_id);
    }

    /// 管理しているロック数
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
