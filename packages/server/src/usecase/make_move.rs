//! UseCase: 指し手の中継
//!
//! 指し手の合法性はクライアント側のルールエンジンが判定するため、ここでは検証しません。
//! 受け取った盤面で Room の現在局面を置き換え、送信者以外の全員に中継します。

use std::sync::Arc;

use gambit_shared::time::Clock;

use crate::domain::{
    BoardState, ChessMove, ConnectionId, MessagePusher, Notification, PlayerId, RoomId,
    RoomRepository, RoomStatus, Timestamp,
};

use super::{
    error::GameEventError,
    support::{broadcast_logged, lock_existing_room},
};

/// 指し手中継のユースケース
pub struct MakeMoveUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl MakeMoveUseCase {
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

    /// 指し手を記録して中継する
    ///
    /// `sender` は指し手を送ってきた接続で、中継先から除外されます。
    pub async fn execute(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        chess_move: ChessMove,
        board_state: BoardState,
        sender: ConnectionId,
    ) -> Result<(), GameEventError> {
        let mut room = lock_existing_room(self.repository.as_ref(), &room_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        if room.status() == RoomStatus::Finished {
            tracing::warn!(
                "Relaying move from '{}' in finished room '{}'",
                player_id,
                room_id
            );
        }

        room.record_move(chess_move.clone(), board_state.clone(), now);
        tracing::debug!(
            "Move #{} by '{}' in room '{}'",
            room.board().moves.len(),
            player_id,
            room_id
        );

        let notification = Notification::MoveMade {
            chess_move,
            player_id,
            board_state,
        };
        broadcast_logged(
            self.message_pusher.as_ref(),
            room.connections_except(&sender),
            &notification,
        )
        .await;

        Ok(())
    }
}
