//! ID・パスワードの生成
//!
//! 推測されにくいが暗号学的に強固ではない短い文字列を生成します。
//! 乱数源には UUID v4 を使います。

use super::{RoomId, RoomPassword, ValueObjectError, value_object};

/// UUID v4 の 16 進表現から先頭 `len` 文字を取り出す
fn random_hex(len: usize) -> String {
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(len)
        .collect()
}

/// RoomId の生成
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// 8 桁の 16 進数 RoomId を生成
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        RoomId::new(random_hex(value_object::ROOM_ID_LENGTH))
    }
}

/// Room パスワードの生成
pub struct RoomPasswordFactory;

impl RoomPasswordFactory {
    /// 6 桁の 16 進数パスワードを生成
    pub fn generate() -> Result<RoomPassword, ValueObjectError> {
        RoomPassword::new(random_hex(value_object::ROOM_PASSWORD_LENGTH))
    }
}
