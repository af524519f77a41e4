//! UseCase: メッセージ送信処理（チャット・リアクション）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ履歴への追加と、送信者を含む全参加者へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 後から入室した参加者が履歴を受け取れることは Room の基本機能
//! - 期限切れ・未入室の接続からのメッセージが履歴に混入してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：テキスト・リアクションの送信
//! - 異常系：空の入力、期限切れ、未入室の接続
//! - エッジケース：存在しない Room への送信

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, MessageContent, MessagePusher, ParticipantName, RoomEvent, RoomId,
    RoomRepository, Timestamp,
};

use super::{error::SendMessageError, room_lock::RoomLocks};

/// メッセージ送信リクエスト
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub connection_id: ConnectionId,
    pub room_id: String,
    /// 表示名（クライアントの申告値をそのまま記録する）
    pub sender: String,
    pub content: String,
    pub is_reaction: bool,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    locks: Arc<RoomLocks>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        locks: Arc<RoomLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            locks,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// 履歴への追加とブロードキャストは Room のロック内で行うため、
    /// 全参加者が同じ順序でメッセージを受け取る。
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 履歴に追加されたメッセージ
    /// * `Err(SendMessageError)` - 送信失敗（履歴は変更されず、通知も行われない）
    pub async fn execute(&self, command: SendMessageCommand) -> Result<ChatMessage, SendMessageError> {
        let SendMessageCommand {
            connection_id,
            room_id,
            sender,
            content,
            is_reaction,
        } = command;

        if room_id.trim().is_empty() {
            return Err(SendMessageError::Validation("roomId is required".to_string()));
        }
        let sender =
            ParticipantName::new(sender).map_err(|e| SendMessageError::Validation(e.to_string()))?;
        let content =
            MessageContent::new(content).map_err(|e| SendMessageError::Validation(e.to_string()))?;
        let Ok(room_id) = RoomId::new(room_id) else {
            return Err(SendMessageError::NotFound);
        };

        let exists = self
            .repository
            .find_room(&room_id)
            .await
            .map_err(|e| SendMessageError::ServerError(e.to_string()))?
            .is_some();
        if !exists {
            return Err(SendMessageError::NotFound);
        }

        let _guard = self.locks.acquire(&room_id).await;
        let mut room = self
            .repository
            .find_room(&room_id)
            .await
            .map_err(|e| SendMessageError::ServerError(e.to_string()))?
            .ok_or(SendMessageError::NotFound)?;

        let now = Timestamp::new(self.clock.now_millis());
        if room.is_expired(now) {
            return Err(SendMessageError::Expired);
        }
        if room.find_active_by_connection(&connection_id).is_none() {
            return Err(SendMessageError::NotJoined);
        }

        let message = ChatMessage::new(sender, content, is_reaction, now);
        room.append_message(message.clone(), now)
            .map_err(|_| SendMessageError::Expired)?;

        self.repository.save_room(room.clone()).await.map_err(|e| {
            tracing::error!(room_id = %room_id, "Failed to persist message: {}", e);
            SendMessageError::ServerError(e.to_string())
        })?;

        tracing::debug!(
            room_id = %room_id,
            connection_id = %connection_id,
            is_reaction,
            "Message appended"
        );

        if let Err(e) = self
            .message_pusher
            .broadcast(
                room.active_connection_ids(),
                &RoomEvent::NewMessage(message.clone()),
            )
            .await
        {
            tracing::warn!(room_id = %room_id, "Failed to broadcast new-message: {}", e);
        }

        Ok(message)
    }
}
