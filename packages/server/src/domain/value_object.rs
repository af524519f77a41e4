//! Value Objects
//!
//! 生成時にバリデーションを行い、不正な値を持つインスタンスが存在しないことを保証します。

use serde::{Deserialize, Serialize};

use super::error::ValueObjectError;

/// Room ID の長さ（16進数文字数）
pub const ROOM_ID_LENGTH: usize = 8;
/// Room パスワードの長さ（16進数文字数）
pub const ROOM_PASSWORD_LENGTH: usize = 6;
/// Room 名の最大文字数
pub const ROOM_NAME_MAX_CHARS: usize = 100;
/// 参加者名の最大文字数
pub const PARTICIPANT_NAME_MAX_CHARS: usize = 50;
/// メッセージ本文の最大文字数
pub const MESSAGE_CONTENT_MAX_CHARS: usize = 2000;
/// Room の最短有効時間（分）
pub const MIN_ROOM_DURATION_MINUTES: i64 = 1;
/// Room の最長有効時間（分）
pub const MAX_ROOM_DURATION_MINUTES: i64 = 360;

fn require_non_blank(value: &str, field: &'static str) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    Ok(())
}

fn require_max_chars(value: &str, field: &'static str, max: usize) -> Result<(), ValueObjectError> {
    let chars = value.chars().count();
    if chars > max {
        return Err(ValueObjectError::TooLong { field, max, actual: chars });
    }
    Ok(())
}

/// Room の識別子
///
/// 生成時は 8 桁の 16 進数だが、クライアントから受け取る値は空でなければ受け付ける
/// （存在しない ID は `NotFound` として扱う）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(&value, "roomId")?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Room に参加するための共有パスワード（完全一致で比較）
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPassword(String);

impl RoomPassword {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(&value, "password")?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 入力されたパスワードと一致するか
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl std::fmt::Debug for RoomPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RoomPassword(***)")
    }
}

/// Room の表示名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(&value, "name")?;
        require_max_chars(&value, "name", ROOM_NAME_MAX_CHARS)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 参加者の表示名（Room 内のアクティブな参加者間で一意）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(&value, "name")?;
        require_max_chars(&value, "name", PARTICIPANT_NAME_MAX_CHARS)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// トランスポートセッション（WebSocket 接続）の識別子
///
/// 再接続のたびに新しい値が払い出される。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(&value, "connectionId")?;
        Ok(Self(value))
    }

    /// UUID v4 から新しい ConnectionId を払い出す
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// チャットメッセージ・リアクションの本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(&value, "content")?;
        require_max_chars(&value, "content", MESSAGE_CONTENT_MAX_CHARS)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Room の有効時間（分、1〜360）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomDuration(i64);

impl RoomDuration {
    pub fn from_minutes(minutes: i64) -> Result<Self, ValueObjectError> {
        if !(MIN_ROOM_DURATION_MINUTES..=MAX_ROOM_DURATION_MINUTES).contains(&minutes) {
            return Err(ValueObjectError::OutOfRange {
                field: "durationMinutes",
                min: MIN_ROOM_DURATION_MINUTES,
                max: MAX_ROOM_DURATION_MINUTES,
                actual: minutes,
            });
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> i64 {
        self.0
    }

    pub fn as_millis(&self) -> i64 {
        self.0 * focusroom_shared::time::MILLIS_PER_MINUTE
    }
}

/// Unix タイムスタンプ（UTC、ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// 指定ミリ秒後のタイムスタンプ
    pub fn add_millis(&self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}

/// ピア間の接続ネゴシエーション（offer / answer / candidate）ペイロード
///
/// 中身は解釈せず、そのまま中継する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPayload(serde_json::Value);

impl SignalPayload {
    pub fn new(value: serde_json::Value) -> Result<Self, ValueObjectError> {
        if value.is_null() {
            return Err(ValueObjectError::Empty("payload"));
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}
