//! UseCase: 投了

use std::sync::Arc;

use gambit_shared::time::Clock;

use crate::domain::{
    GameEnd, GameRecordStore, MessagePusher, PlayerId, RoomId, RoomRepository, Timestamp,
};

use super::{
    error::GameEventError,
    support::{conclude_game, lock_existing_room},
};

/// 投了のユースケース
///
/// 投了したプレイヤーの相手を勝者として終局させます。相手が着席していなければ何もしません。
pub struct ResignUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    record_store: Arc<dyn GameRecordStore>,
    clock: Arc<dyn Clock>,
}

impl ResignUseCase {
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

    pub async fn execute(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<GameEnd, GameEventError> {
        let mut room = lock_existing_room(self.repository.as_ref(), &room_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        let game_end = match (room.player(&player_id), room.opponent_of(&player_id)) {
            (Some(resigned), Some(winner)) => GameEnd::resignation(resigned, winner),
            _ => {
                return Err(GameEventError::OpponentMissing {
                    room_id: room_id.as_str().to_string(),
                    player_id: player_id.as_str().to_string(),
                });
            }
        };

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
