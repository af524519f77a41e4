//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の生成に失敗したときのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} must be between {min} and {max} (got {actual})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },
}

/// Room エンティティの状態遷移エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room has expired")]
    Expired,

    #[error("name '{0}' is already taken by an active participant")]
    NameTaken(String),

    #[error("connection '{0}' is not an active participant")]
    NotActive(String),
}

/// Repository（データストア）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' already exists")]
    DuplicateRoom(String),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

/// MessagePusher（通知）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    EncodeFailed(String),
}
