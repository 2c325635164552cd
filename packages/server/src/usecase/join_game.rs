//! UseCase: 入室処理
//!
//! 同じ player_id の再入室は再接続として扱い、座席が空いていれば着席、
//! 満席なら観戦者として受け入れます。入室が失敗することはありません。

use std::sync::Arc;

use gambit_shared::time::Clock;

use crate::domain::{
    Admission, BoardState, ConnectionId, MessagePusher, Notification, PlayerId, PlayerName,
    RoomId, RoomRepository, Timestamp,
};

use super::support::{broadcast_logged, push_logged, state_replay};

/// 入室のユースケース
pub struct JoinGameUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinGameUseCase {
    /// 新しい JoinGameUseCase を作成
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

    /// 入室を実行
    ///
    /// 未知の Room ID であれば Room を作成します。
    ///
    /// # Returns
    ///
    /// 再接続・着席・観戦のどれとして受け入れたか
    pub async fn execute(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        player_name: PlayerName,
        connection_id: ConnectionId,
    ) -> Admission {
        let now = Timestamp::new(self.clock.now_millis());

        // ハンドル取得とロックの間に Room が削除された場合は作り直す
        let mut room = loop {
            let shared = self.repository.get_or_create(&room_id, now).await;
            let room = shared.lock_owned().await;
            if !room.is_evicted() {
                break room;
            }
            tracing::debug!("Room '{}' was evicted while joining, retrying", room_id);
        };

        let admission = room.admit(player_id.clone(), player_name, connection_id.clone(), now);
        let pusher = self.message_pusher.as_ref();

        match &admission {
            Admission::Reconnected { color } => {
                tracing::info!(
                    "Player '{}' reconnected to room '{}' as {}",
                    player_id,
                    room_id,
                    color.as_str()
                );
                push_logged(pusher, &connection_id, &Notification::ColorAssigned { color: *color })
                    .await;
                if room.has_started() {
                    push_logged(pusher, &connection_id, &state_replay(&room, false)).await;
                }
            }
            Admission::Seated {
                color,
                started_game,
            } => {
                tracing::info!(
                    "Player '{}' seated in room '{}' as {}",
                    player_id,
                    room_id,
                    color.as_str()
                );
                push_logged(pusher, &connection_id, &Notification::ColorAssigned { color: *color })
                    .await;

                if let Some(player) = room.player(&player_id).cloned() {
                    let joined = Notification::PlayerJoined {
                        player,
                        players: room.players().to_vec(),
                        game_started: room.has_started(),
                    };
                    broadcast_logged(pusher, room.connected_connections(), &joined).await;
                }

                if *started_game {
                    tracing::info!("Game started in room '{}'", room_id);
                    let start = Notification::GameStart {
                        players: room.players().to_vec(),
                        initial_board_state: BoardState::initial(),
                    };
                    broadcast_logged(pusher, room.connected_connections(), &start).await;
                }
            }
            Admission::Spectating { rejoined } => {
                tracing::info!(
                    "Player '{}' {} room '{}' as a spectator",
                    player_id,
                    if *rejoined { "rejoined" } else { "joined" },
                    room_id
                );
                push_logged(pusher, &connection_id, &Notification::SpectatorMode).await;
                if room.has_started() {
                    push_logged(pusher, &connection_id, &state_replay(&room, true)).await;
                }
            }
        }

        admission
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Color, RoomStatus};
    use crate::usecase::test_support::{Fixture, conn, name, pid, room_id};

    fn usecase(fixture: &Fixture) -> JoinGameUseCase {
        JoinGameUseCase::new(fixture.repository(), fixture.pusher(), fixture.clock.clone())
    }

    #[tokio::test]
    async fn test_first_join_creates_room_and_assigns_white() {
        // テスト項目: 未知の Room への入室で Room が作られ、白が割り当てられる
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture);

        // when (操作):
        let admission = usecase
            .execute(room_id("R1"), pid("a"), name("Alice"), conn("c1"))
            .await;

        // then (期待する結果):
        assert_eq!(
            admission,
            Admission::Seated {
                color: Color::White,
                started_game: false
            }
        );
        assert_eq!(fixture.repository().count().await, 1);
        assert_eq!(fixture.pusher.kinds(&conn("c1")), vec!["color-assigned", "player-joined"]);
    }

    #[tokio::test]
    async fn test_second_join_starts_game_for_everyone() {
        // テスト項目: 2 人目の入室で game-start が両者に送られる
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture);
        usecase
            .execute(room_id("R1"), pid("a"), name("Alice"), conn("c1"))
            .await;

        // when (操作):
        let admission = usecase
            .execute(room_id("R1"), pid("b"), name("Bob"), conn("c2"))
            .await;

        // then (期待する結果):
        assert_eq!(
            admission,
            Admission::Seated {
                color: Color::Black,
                started_game: true
            }
        );
        assert_eq!(
            fixture.pusher.kinds(&conn("c1")),
            vec!["color-assigned", "player-joined", "player-joined", "game-start"]
        );
        assert_eq!(
            fixture.pusher.kinds(&conn("c2")),
            vec!["color-assigned", "player-joined", "game-start"]
        );

        let joined = fixture.pusher.received(&conn("c2"))[1].clone();
        match joined {
            Notification::PlayerJoined {
                player,
                players,
                game_started,
            } => {
                assert_eq!(player.id, pid("b"));
                assert_eq!(players.len(), 2);
                assert!(game_started);
            }
            other => panic!("unexpected notification: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_third_player_is_spectator_with_private_replay() {
        // テスト項目: 満席の Room に入った 3 人目は観戦者になり、本人だけに状態が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture);
        usecase
            .execute(room_id("R1"), pid("a"), name("Alice"), conn("c1"))
            .await;
        usecase
            .execute(room_id("R1"), pid("b"), name("Bob"), conn("c2"))
            .await;
        fixture.pusher.clear();

        // when (操作):
        let admission = usecase
            .execute(room_id("R1"), pid("c"), name("Carol"), conn("c3"))
            .await;

        // then (期待する結果):
        assert_eq!(admission, Admission::Spectating { rejoined: false });
        assert_eq!(fixture.pusher.kinds(&conn("c3")), vec!["spectator-mode", "game-state"]);
        assert!(fixture.pusher.received(&conn("c1")).is_empty());
        assert!(fixture.pusher.received(&conn("c2")).is_empty());
        match &fixture.pusher.received(&conn("c3"))[1] {
            Notification::GameState { as_spectator, .. } => assert!(*as_spectator),
            other => panic!("unexpected notification: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reconnect_keeps_color_and_replays_state() {
        // テスト項目: 同じ player_id の再入室は色を保ったまま、本人だけに状態が再送される
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture);
        usecase
            .execute(room_id("R1"), pid("a"), name("Alice"), conn("c1"))
            .await;
        usecase
            .execute(room_id("R1"), pid("b"), name("Bob"), conn("c2"))
            .await;
        fixture.pusher.clear();

        // when (操作):
        let admission = usecase
            .execute(room_id("R1"), pid("a"), name("Alice"), conn("c9"))
            .await;

        // then (期待する結果):
        assert_eq!(
            admission,
            Admission::Reconnected {
                color: Color::White
            }
        );
        assert_eq!(fixture.pusher.kinds(&conn("c9")), vec!["color-assigned", "game-state"]);
        assert!(fixture.pusher.received(&conn("c2")).is_empty());

        let shared = fixture.repository().find(&room_id("R1")).await.unwrap();
        let room = shared.lock().await;
        assert_eq!(room.players()[0].connection_id, conn("c9"));
        assert_eq!(room.status(), RoomStatus::Playing);
    }

    #[tokio::test]
    async fn test_reconnect_while_waiting_gets_no_replay() {
        // テスト項目: 対局開始前の再接続では状態の再送は行わない
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture);
        usecase
            .execute(room_id("R1"), pid("a"), name("Alice"), conn("c1"))
            .await;
        fixture.pusher.clear();

        // when (操作):
        usecase
            .execute(room_id("R1"), pid("a"), name("Alice"), conn("c2"))
            .await;

        // then (期待する結果):
        assert_eq!(fixture.pusher.kinds(&conn("c2")), vec!["color-assigned"]);
    }

    #[tokio::test]
    async fn test_join_after_eviction_creates_fresh_room() {
        // テスト項目: 削除済みの Room ハンドルを掴んでいても、新しい Room に入室できる
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture);
        let repository = fixture.repository();
        let stale = repository
            .get_or_create(&room_id("R1"), Timestamp::new(0))
            .await;
        {
            let mut room = stale.lock().await;
            room.mark_evicted();
            repository.remove(&room_id("R1")).await.unwrap();
        }

        // when (操作):
        let admission = usecase
            .execute(room_id("R1"), pid("a"), name("Alice"), conn("c1"))
            .await;

        // then (期待する結果):
        assert!(matches!(admission, Admission::Seated { .. }));
        let shared = repository.find(&room_id("R1")).await.unwrap();
        assert!(!shared.lock().await.is_evicted());
        assert!(stale.lock().await.players().is_empty());
    }
}
