//! UseCase: クライアントが検出した終局の通知
//!
//! チェックメイトや千日手などの判定はクライアント側のルールエンジンが行います。
//! サーバーは結果の種類から表示用メッセージを組み立てて全員に中継します。

use std::sync::Arc;

use gambit_shared::time::Clock;

use crate::domain::{
    GameEnd, GameRecordStore, GameResult, MessagePusher, PlayerId, RoomId, RoomRepository,
    RoomStatus, Timestamp,
};

use super::{
    error::GameEventError,
    support::{conclude_game, lock_existing_room},
};

/// 終局通知のユースケース
pub struct ReportGameOverUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    record_store: Arc<dyn GameRecordStore>,
    clock: Arc<dyn Clock>,
}

impl ReportGameOverUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        record_store: Arc<dyn GameRecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            record_store,
            clock,
        }
    }

    /// 終局を中継する
    ///
    /// 既に終局している Room への報告も中継しますが、記録は最初の 1 回だけ保存されます。
    pub async fn execute(
        &self,
        room_id: RoomId,
        result: GameResult,
        winner_id: Option<PlayerId>,
    ) -> Result<GameEnd, GameEventError> {
        let mut room = lock_existing_room(self.repository.as_ref(), &room_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        if room.status() == RoomStatus::Finished {
            tracing::debug!("Room '{}' already finished, relaying late game-over", room_id);
        }

        let winner = winner_id.map(|id| {
            let display_name = room
                .player(&id)
                .map(|p| p.name.as_str().to_string())
                .unwrap_or_else(|| id.as_str().to_string());
            (id, display_name)
        });
        let game_end = GameEnd::reported(result, winner);

        conclude_game(
            &mut room,
            game_end.clone(),
            now,
            self.message_pusher.as_ref(),
            &self.record_store,
        )
        .await?;

        Ok(game_end)
    }
}
