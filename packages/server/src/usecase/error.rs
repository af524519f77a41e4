//! UseCase 層のエラー定義
//!
//! `Display` の文言はそのままクライアントへのエラー理由として使われます。
//! `ServerError` の詳細はログにのみ出力し、クライアントには返しません。

use thiserror::Error;

/// Room 作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("Duration must be between 1 and 360 minutes")]
    InvalidDuration,

    #[error("Room name is invalid: {0}")]
    InvalidName(String),

    #[error("Failed to create room")]
    ServerError(String),
}

/// Room の ID・パスワード確認のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyRoomError {
    #[error("Room not found or password incorrect")]
    NotFound,

    #[error("This room has expired")]
    Expired,

    #[error("Failed to join room")]
    ServerError(String),
}

/// 入室のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("Invalid join request: {0}")]
    Validation(String),

    /// 存在しない Room とパスワード不一致は区別しない
    #[error("Invalid room ID or password")]
    NotFound,

    #[error("This room has expired")]
    Expired,

    #[error("Name already taken in this room")]
    NameTaken(String),

    #[error("Server error joining room")]
    ServerError(String),
}

/// 退出のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveRoomError {
    #[error("Server error leaving room")]
    ServerError(String),
}

/// ステータス更新のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateStatusError {
    #[error("This room has expired")]
    Expired,

    #[error("Server error updating status")]
    ServerError(String),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("Invalid message data: {0}")]
    Validation(String),

    #[error("Room not found")]
    NotFound,

    #[error("This room has expired")]
    Expired,

    #[error("You are not a participant of this room")]
    NotJoined,

    #[error("Server error sending message")]
    ServerError(String),
}

/// Room 状態確認のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckRoomError {
    #[error("Server error checking room status")]
    ServerError(String),
}

/// 期限切れ Room 掃除のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReapError {
    #[error("Failed to sweep expired rooms: {0}")]
    ServerError(String),
}

/// 入退室ログ取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetActivityLogsError {
    #[error("Failed to load activity logs")]
    ServerError(String),
}
