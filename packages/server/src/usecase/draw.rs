//! UseCase: 引き分けの提案と応答

use std::sync::Arc;

use gambit_shared::time::Clock;

use crate::domain::{
    ConnectionId, GameEnd, GameRecordStore, MessagePusher, Notification, PlayerId, RoomId,
    RoomRepository, Timestamp,
};

use super::{
    error::GameEventError,
    support::{broadcast_logged, conclude_game, lock_existing_room, push_logged},
};

/// 引き分け提案のユースケース
///
/// 提案を記録して他の全員に知らせるだけで、Room の状態は変えません。
pub struct OfferDrawUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl OfferDrawUseCase {
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

    pub async fn execute(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        sender: ConnectionId,
    ) -> Result<(), GameEventError> {
        let mut room = lock_existing_room(self.repository.as_ref(), &room_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        room.offer_draw(player_id.clone(), now);
        tracing::info!("Player '{}' offered a draw in room '{}'", player_id, room_id);

        broadcast_logged(
            self.message_pusher.as_ref(),
            room.connections_except(&sender),
            &Notification::DrawOffered { player_id },
        )
        .await;

        Ok(())
    }
}

/// 引き分け提案への応答のユースケース
pub struct RespondToDrawUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    record_store: Arc<dyn GameRecordStore>,
    clock: Arc<dyn Clock>,
}

impl RespondToDrawUseCase {
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

    /// 応答を実行
    ///
    /// 受諾なら合意による引き分けで終局し、全員に game-end を送ります。
    /// 拒否なら提案者だけに draw-declined を送ります。提案者が記録されていない場合は
    /// 応答者の相手を提案者とみなします。
    ///
    /// # Arguments
    ///
    /// * `player_id` - 応答したプレイヤー
    pub async fn execute(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        accepted: bool,
    ) -> Result<(), GameEventError> {
        let mut room = lock_existing_room(self.repository.as_ref(), &room_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        let opponent_id = room
            .opponent_of(&player_id)
            .map(|p| p.id.clone())
            .ok_or_else(|| GameEventError::OpponentMissing {
                room_id: room_id.as_str().to_string(),
                player_id: player_id.as_str().to_string(),
            })?;

        if accepted {
            tracing::info!("Player '{}' accepted a draw in room '{}'", player_id, room_id);
            conclude_game(
                &mut room,
                GameEnd::draw_by_agreement(),
                now,
                self.message_pusher.as_ref(),
                &self.record_store,
            )
            .await?;
            return Ok(());
        }

        let offerer = room
            .take_draw_offer()
            .filter(|id| id != &player_id)
            .unwrap_or(opponent_id);
        tracing::info!(
            "Player '{}' declined the draw offered by '{}' in room '{}'",
            player_id,
            offerer,
            room_id
        );

        match room.connection_of(&offerer) {
            Some(connection_id) => {
                push_logged(
                    self.message_pusher.as_ref(),
                    &connection_id,
                    &Notification::DrawDeclined { player_id },
                )
                .await;
            }
            None => tracing::debug!(
                "Draw offerer '{}' is not connected, dropping draw-declined",
                offerer
            ),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GameRecordError, GameResult, MockGameRecordStore, RoomStatus};
    use crate::usecase::{
        JoinGameUseCase,
        test_support::{Fixture, conn, name, pid, room_id},
    };

    async fn seat_two_and_spectator(fixture: &Fixture) {
        let join = JoinGameUseCase::new(fixture.repository(), fixture.pusher(), fixture.clock.clone());
        join.execute(room_id("R1"), pid("a"), name("Alice"), conn("c1"))
            .await;
        join.execute(room_id("R1"), pid("b"), name("Bob"), conn("c2"))
            .await;
        join.execute(room_id("R1"), pid("s"), name("Sam"), conn("c3"))
            .await;
        fixture.pusher.clear();
    }

    fn offer(fixture: &Fixture) -> OfferDrawUseCase {
        OfferDrawUseCase::new(fixture.repository(), fixture.pusher(), fixture.clock.clone())
    }

    fn respond(fixture: &Fixture) -> RespondToDrawUseCase {
        RespondToDrawUseCase::new(
            fixture.repository(),
            fixture.pusher(),
            fixture.records(),
            fixture.clock.clone(),
        )
    }

    async fn status(fixture: &Fixture) -> RoomStatus {
        let shared = fixture.repository().find(&room_id("R1")).await.unwrap();
        let status = shared.lock().await.status();
        status
    }

    #[tokio::test]
    async fn test_offer_is_relayed_to_others_without_state_change() {
        // テスト項目: 引き分け提案は提案者以外に届き、Room の状態は変わらない
        // given (前提条件):
        let fixture = Fixture::new();
        seat_two_and_spectator(&fixture).await;

        // when (操作):
        offer(&fixture)
            .execute(room_id("R1"), pid("a"), conn("c1"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(fixture.pusher.received(&conn("c1")).is_empty());
        assert_eq!(
            fixture.pusher.received(&conn("c2")),
            vec![Notification::DrawOffered { player_id: pid("a") }]
        );
        assert_eq!(fixture.pusher.kinds(&conn("c3")), vec!["draw-offered"]);
        assert_eq!(status(&fixture).await, RoomStatus::Playing);
    }

    #[tokio::test]
    async fn test_accepted_draw_ends_game_for_everyone() {
        // テスト項目: 受諾すると全員に引き分けの game-end が届き、記録が 1 件保存される
        // given (前提条件):
        let fixture = Fixture::new();
        seat_two_and_spectator(&fixture).await;
        offer(&fixture)
            .execute(room_id("R1"), pid("a"), conn("c1"))
            .await
            .unwrap();
        fixture.pusher.clear();

        // when (操作):
        respond(&fixture)
            .execute(room_id("R1"), pid("b"), true)
            .await
            .unwrap();

        // then (期待する結果):
        let expected = Notification::GameEnd(GameEnd::draw_by_agreement());
        for c in ["c1", "c2", "c3"] {
            assert_eq!(fixture.pusher.received(&conn(c)), vec![expected.clone()]);
        }
        assert_eq!(status(&fixture).await, RoomStatus::Finished);

        fixture.wait_for_records(1).await;
        let records = fixture.records.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].result, GameResult::Draw);
        assert_eq!(records[0].winner_id, None);
    }

    #[tokio::test]
    async fn test_declined_draw_reaches_offerer_only() {
        // テスト項目: 拒否は提案者だけに届き、対局は続く
        // given (前提条件):
        let fixture = Fixture::new();
        seat_two_and_spectator(&fixture).await;
        offer(&fixture)
            .execute(room_id("R1"), pid("a"), conn("c1"))
            .await
            .unwrap();
        fixture.pusher.clear();

        // when (操作):
        respond(&fixture)
            .execute(room_id("R1"), pid("b"), false)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            fixture.pusher.received(&conn("c1")),
            vec![Notification::DrawDeclined { player_id: pid("b") }]
        );
        assert!(fixture.pusher.received(&conn("c2")).is_empty());
        assert!(fixture.pusher.received(&conn("c3")).is_empty());
        assert_eq!(status(&fixture).await, RoomStatus::Playing);
    }

    #[tokio::test]
    async fn test_response_without_opponent_is_noop() {
        // テスト項目: 相手が着席していない Room での応答は何もしない
        // given (前提条件):
        let fixture = Fixture::new();
        let join = JoinGameUseCase::new(fixture.repository(), fixture.pusher(), fixture.clock.clone());
        join.execute(room_id("R1"), pid("a"), name("Alice"), conn("c1"))
            .await;
        fixture.pusher.clear();

        // when (操作):
        let result = respond(&fixture)
            .execute(room_id("R1"), pid("a"), true)
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(GameEventError::OpponentMissing {
                room_id: "R1".to_string(),
                player_id: "a".to_string(),
            })
        );
        assert!(fixture.pusher.received(&conn("c1")).is_empty());
        assert_eq!(status(&fixture).await, RoomStatus::Waiting);
    }

    #[tokio::test]
    async fn test_record_store_failure_does_not_block_game_end() {
        // テスト項目: 記録の保存に失敗しても game-end は全員に届く
        // given (前提条件):
        let fixture = Fixture::new();
        seat_two_and_spectator(&fixture).await;
        let mut store = MockGameRecordStore::new();
        store
            .expect_save()
            .returning(|_| Err(GameRecordError::Unavailable("offline".to_string())));
        let usecase = RespondToDrawUseCase::new(
            fixture.repository(),
            fixture.pusher(),
            Arc::new(store),
            fixture.clock.clone(),
        );

        // when (操作):
        let result = usecase.execute(room_id("R1"), pid("b"), true).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(fixture.pusher.kinds(&conn("c1")), vec!["game-end"]);
        assert_eq!(fixture.pusher.kinds(&conn("c3")), vec!["game-end"]);
        assert_eq!(status(&fixture).await, RoomStatus::Finished);
    }
}
