//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ActivityLogEntry, ConnectionId, RepositoryError, Room, RoomId, Timestamp};

/// Room Repository trait
///
/// Room の永続化を担当する。UseCase 層はこの trait に依存し、
/// Infrastructure 層の具体的な実装には依存しない。
///
/// 同じ Room への read-modify-write は UseCase 層の `RoomLocks` で直列化される前提。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を新規作成（ID が重複していれば `DuplicateRoom`）
    async fn insert_room(&self, room: Room) -> Result<(), RepositoryError>;

    /// Room を取得
    async fn find_room(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError>;

    /// Room を上書き保存（削除済みなら `RoomNotFound`）
    async fn save_room(&self, room: Room) -> Result<(), RepositoryError>;

    /// 接続がアクティブな参加者としてバインドされている Room の ID を取得
    async fn find_room_id_by_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<RoomId>, RepositoryError>;

    /// `now` 時点で期限切れの Room の ID 一覧
    async fn find_expired_room_ids(&self, now: Timestamp) -> Result<Vec<RoomId>, RepositoryError>;

    /// Room を削除（存在しなければ何もしない）
    async fn delete_room(&self, room_id: &RoomId) -> Result<(), RepositoryError>;
}

/// 入退室ログ Repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// 入室記録を追加
    async fn open_entry(&self, entry: ActivityLogEntry) -> Result<(), RepositoryError>;

    /// 接続の開いている記録を閉じる（開いている記録がなければ何もしない）
    async fn close_entry(
        &self,
        connection_id: &ConnectionId,
        left_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// 記録一覧（`room_id` 指定時はその Room のみ、記録順）
    async fn list_entries(
        &self,
        room_id: Option<RoomId>,
    ) -> Result<Vec<ActivityLogEntry>, RepositoryError>;
}
