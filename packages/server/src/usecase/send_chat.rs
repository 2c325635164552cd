//! UseCase: チャット送信
//!
//! メッセージを Room の履歴に追加し、送信者を含む全員にブロードキャストします。
//! 送信者の画面も同じ通知から描画されるため、送信者を除外しません。

use std::sync::Arc;

use gambit_shared::time::Clock;

use crate::domain::{
    ChatMessage, MessageContent, MessagePusher, Notification, PlayerName, RoomId, RoomRepository,
    Timestamp,
};

use super::{
    error::GameEventError,
    support::{broadcast_logged, lock_existing_room},
};

/// チャット送信のユースケース
pub struct SendChatUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendChatUseCase {
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

    /// チャット送信を実行
    ///
    /// タイムスタンプはサーバーの時計で付与します。
    pub async fn execute(
        &self,
        room_id: RoomId,
        text: MessageContent,
        sender_name: PlayerName,
    ) -> Result<ChatMessage, GameEventError> {
        let mut room = lock_existing_room(self.repository.as_ref(), &room_id).await?;
        let timestamp = Timestamp::new(self.clock.now_millis());

        let message = ChatMessage::new(text, sender_name, timestamp);
        if let Some(evicted) = room.add_message(message.clone()) {
            tracing::trace!(
                "Chat history of room '{}' is full, dropped message from {}",
                room_id,
                evicted.sender_name
            );
        }

        broadcast_logged(
            self.message_pusher.as_ref(),
            room.connected_connections(),
            &Notification::Chat(message.clone()),
        )
        .await;

        Ok(message)
    }
}
