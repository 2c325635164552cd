//! UseCase: 切断処理
//!
//! 切断した接続に紐づくプレイヤー・観戦者を全ての Room から探し、`connected = false` にします。
//! 座席・盤面・履歴は残すため、同じ player_id で入室し直せば再接続になります。

use std::sync::Arc;

use gambit_shared::time::Clock;

use crate::domain::{
    ConnectionId, Departure, MessagePusher, Notification, RoomId, RoomRepository, Timestamp,
};

use super::support::broadcast_logged;

/// 切断処理のユースケース
pub struct DisconnectPlayerUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectPlayerUseCase {
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

    /// 切断処理を実行
    ///
    /// プレイヤーが離れた場合だけ、Room の残りのメンバーに player-disconnected を送ります。
    ///
    /// # Returns
    ///
    /// 離れた Room とメンバーの一覧
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<(RoomId, Departure)> {
        self.message_pusher.unregister_client(connection_id).await;

        let now = Timestamp::new(self.clock.now_millis());
        let mut departures = Vec::new();

        for shared in self.repository.all_rooms().await {
            let mut room = shared.lock().await;
            if room.is_evicted() {
                continue;
            }
            let Some(departure) = room.mark_disconnected(connection_id, now) else {
                continue;
            };

            match &departure {
                Departure::Player { player_id, name } => {
                    tracing::info!("Player '{}' disconnected from room '{}'", player_id, room.id);
                    let notification = Notification::PlayerDisconnected {
                        player_id: player_id.clone(),
                        player_name: name.clone(),
                    };
                    broadcast_logged(
                        self.message_pusher.as_ref(),
                        room.connected_connections(),
                        &notification,
                    )
                    .await;
                }
                Departure::Spectator { player_id } => {
                    tracing::info!("Spectator '{}' left room '{}'", player_id, room.id);
                }
            }

            departures.push((room.id.clone(), departure));
        }

        departures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn usecase(fixture: &Fixture) -> DisconnectPlayerUseCase {
        DisconnectPlayerUseCase::new(fixture.repository(), fixture.pusher(), fixture.clock.clone())
    }

    #[tokio::test]
    async fn test_player_disconnect_notifies_rest_of_room() {
        // テスト項目: プレイヤーの切断は残りのメンバーに通知され、座席は保持される
        // given (前提条件):
        let fixture = Fixture::new();
        seat_two_and_spectator(&fixture).await;

        // when (操作):
        let departures = usecase(&fixture).execute(&conn("c1")).await;

        // then (期待する結果):
        assert_eq!(
            departures,
            vec![(
                room_id("R1"),
                Departure::Player {
                    player_id: pid("a"),
                    name: name("Alice")
                }
            )]
        );
        let expected = Notification::PlayerDisconnected {
            player_id: pid("a"),
            player_name: name("Alice"),
        };
        assert_eq!(fixture.pusher.received(&conn("c2")), vec![expected.clone()]);
        assert_eq!(fixture.pusher.received(&conn("c3")), vec![expected]);
        assert!(fixture.pusher.received(&conn("c1")).is_empty());

        let shared = fixture.repository().find(&room_id("R1")).await.unwrap();
        let room = shared.lock().await;
        assert_eq!(room.players().len(), 2);
        assert!(!room.players()[0].connected);
    }

    #[tokio::test]
    async fn test_spectator_disconnect_is_silent() {
        // テスト項目: 観戦者の切断は誰にも通知されない
        // given (前提条件):
        let fixture = Fixture::new();
        seat_two_and_spectator(&fixture).await;

        // when (操作):
        let departures = usecase(&fixture).execute(&conn("c3")).await;

        // then (期待する結果):
        assert_eq!(
            departures,
            vec![(room_id("R1"), Departure::Spectator { player_id: pid("s") })]
        );
        assert!(fixture.pusher.received(&conn("c1")).is_empty());
        assert!(fixture.pusher.received(&conn("c2")).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_connection_changes_nothing() {
        // テスト項目: どの Room にも属さない接続の切断は何も変えない
        // given (前提条件):
        let fixture = Fixture::new();
        seat_two_and_spectator(&fixture).await;

        // when (操作):
        let departures = usecase(&fixture).execute(&conn("stranger")).await;

        // then (期待する結果):
        assert!(departures.is_empty());
        assert!(fixture.pusher.received(&conn("c1")).is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_then_reconnect_restores_seat() {
        // テスト項目: 切断後に同じ player_id で入室すると、同じ色で再接続され状態が再送される
        // given (前提条件):
        let fixture = Fixture::new();
        seat_two_and_spectator(&fixture).await;
        usecase(&fixture).execute(&conn("c2")).await;
        fixture.pusher.clear();

        // when (操作):
        let join = JoinGameUseCase::new(fixture.repository(), fixture.pusher(), fixture.clock.clone());
        let admission = join
            .execute(room_id("R1"), pid("b"), name("Bob"), conn("c4"))
            .await;

        // then (期待する結果):
        assert_eq!(
            admission,
            crate::domain::Admission::Reconnected {
                color: crate::domain::Color::Black
            }
        );
        assert_eq!(fixture.pusher.kinds(&conn("c4")), vec!["color-assigned", "game-state"]);
        assert!(fixture.pusher.received(&conn("c1")).is_empty());
    }
}
