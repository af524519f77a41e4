//! InMemory ActivityLog Repository 実装
//!
//! 入退室ログを記録順の Vec として保持します。
//!
//! Room が削除されても記録は残します（分析用）。件数が上限を超えると
//! 閉じた記録を古い順に破棄し、開いている記録は破棄しません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ActivityLogEntry, ActivityLogRepository, ConnectionId, RepositoryError, RoomId, Timestamp,
};

/// 保持する記録数の既定の上限
pub const DEFAULT_ACTIVITY_LOG_CAPACITY: usize = 10_000;

/// インメモリ ActivityLog Repository 実装
pub struct InMemoryActivityLogRepository {
    entries: Arc<Mutex<Vec<ActivityLogEntry>>>,
    capacity: usize,
}

impl InMemoryActivityLogRepository {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            capacity: capacity.max(1),
        }
    }
}

impl Default for InMemoryActivityLogRepository {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ACTIVITY_LOG_CAPACITY)
    }
}

/// 上限を超えた分だけ閉じた記録を古い順に取り除く
fn evict_closed(entries: &mut Vec<ActivityLogEntry>, capacity: usize) {
    let mut excess = entries.len().saturating_sub(capacity);
    if excess == 0 {
        return;
    }
    entries.retain(|e| {
        if excess > 0 && !e.is_open() {
            excess -= 1;
            false
        } else {
            true
        }
    });
}

#[async_trait]
impl ActivityLogRepository for InMemoryActivityLogRepository {
    async fn open_entry(&self, entry: ActivityLogEntry) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock().await;
        // 1 接続につき開いている記録は 1 件まで
        if let Some(stale) = entries
            .iter_mut()
            .find(|e| e.is_open() && e.connection_id == entry.connection_id)
        {
            tracing::debug!(
                connection_id = %entry.connection_id,
                "Closing stale activity entry before opening a new one"
            );
            stale.left_at = Some(entry.joined_at);
        }
        entries.push(entry);
        evict_closed(&mut entries, self.capacity);
        Ok(())
    }

    async fn close_entry(
        &self,
        connection_id: &ConnectionId,
        left_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries
            .iter_mut()
            .find(|e| e.is_open() && &e.connection_id == connection_id)
        {
            entry.left_at = Some(left_at);
        }
        Ok(())
    }

    async fn list_entries(
        &self,
        room_id: Option<RoomId>,
    ) -> Result<Vec<ActivityLogEntry>, RepositoryError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|e| room_id.as_ref().is_none_or(|id| &e.room_id == id))
            .cloned()
            .collect())
    }
}
