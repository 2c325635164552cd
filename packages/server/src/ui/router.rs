//! Event Router
//!
//! WebSocket から受け取った `ClientMessage` を値オブジェクトに変換し、対応する UseCase に振り分けます。
//! イベント単位のエラーはここでログに残して終わりにし、接続や Room の他のメンバーには影響させません。

use std::sync::Arc;

use gambit_shared::time::Clock;
use thiserror::Error;

use crate::{
    domain::{
        BoardState, ChessMove, GameRecordStore, MessageContent, MessagePusher, PlayerId,
        PlayerName, RoomId, RoomRepository, ValueObjectError,
    },
    infrastructure::dto::websocket::ClientMessage,
    usecase::{
        DisconnectPlayerUseCase, GameEventError, JoinGameUseCase, MakeMoveUseCase,
        OfferDrawUseCase, ReportGameOverUseCase, ResignUseCase, RespondToDrawUseCase,
        SendChatUseCase,
    },
};

use super::session::ConnectionSession;

#[derive(Debug, Error)]
enum RouteError {
    #[error("invalid payload: {0}")]
    Invalid(#[from] ValueObjectError),

    #[error(transparent)]
    Event(#[from] GameEventError),
}

/// クライアントイベントの振り分け先
pub struct EventRouter {
    join_game_usecase: JoinGameUseCase,
    make_move_usecase: MakeMoveUseCase,
    send_chat_usecase: SendChatUseCase,
    offer_draw_usecase: OfferDrawUseCase,
    respond_to_draw_usecase: RespondToDrawUseCase,
    resign_usecase: ResignUseCase,
    report_game_over_usecase: ReportGameOverUseCase,
    disconnect_player_usecase: DisconnectPlayerUseCase,
}

impl EventRouter {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        record_store: Arc<dyn GameRecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            join_game_usecase: JoinGameUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            make_move_usecase: MakeMoveUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            send_chat_usecase: SendChatUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            offer_draw_usecase: OfferDrawUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            respond_to_draw_usecase: RespondToDrawUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                record_store.clone(),
                clock.clone(),
            ),
            resign_usecase: ResignUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                record_store.clone(),
                clock.clone(),
            ),
            report_game_over_usecase: ReportGameOverUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                record_store,
                clock.clone(),
            ),
            disconnect_player_usecase: DisconnectPlayerUseCase::new(
                repository,
                message_pusher,
                clock,
            ),
        }
    }

    /// 1 件のイベントを処理する
    pub async fn dispatch(&self, session: &mut ConnectionSession, message: ClientMessage) {
        let kind = event_kind(&message);
        match self.route(session, message).await {
            Ok(()) => {}
            Err(RouteError::Invalid(e)) => {
                tracing::warn!("Dropped '{}' event: {}", kind, e);
            }
            Err(RouteError::Event(e)) => {
                tracing::debug!("Ignored '{}' event: {}", kind, e);
            }
        }
    }

    /// 接続が閉じたときの後始末
    pub async fn disconnect(&self, session: &ConnectionSession) {
        let departures = self
            .disconnect_player_usecase
            .execute(session.connection_id())
            .await;
        tracing::debug!(
            "Connection '{}' closed ({} room(s) affected)",
            session.connection_id(),
            departures.len()
        );
    }

    async fn route(
        &self,
        session: &mut ConnectionSession,
        message: ClientMessage,
    ) -> Result<(), RouteError> {
        match message {
            ClientMessage::JoinGame {
                room_id,
                player_id,
                player_name,
            } => {
                let room_id = RoomId::new(room_id)?;
                let player_id = PlayerId::new(player_id)?;
                let player_name = PlayerName::new(player_name)?;
                let admission = self
                    .join_game_usecase
                    .execute(
                        room_id.clone(),
                        player_id.clone(),
                        player_name,
                        session.connection_id().clone(),
                    )
                    .await;
                session.bind(room_id, player_id, &admission);
            }
            ClientMessage::Move {
                room_id,
                r#move,
                player_id,
                board_state,
            } => {
                self.make_move_usecase
                    .execute(
                        RoomId::new(room_id)?,
                        PlayerId::new(player_id)?,
                        ChessMove::new(r#move)?,
                        BoardState::new(board_state)?,
                        session.connection_id().clone(),
                    )
                    .await?;
            }
            ClientMessage::ChatMessage {
                room_id,
                text,
                sender_name,
                timestamp: _,
            } => {
                self.send_chat_usecase
                    .execute(
                        RoomId::new(room_id)?,
                        MessageContent::new(text)?,
                        PlayerName::new(sender_name)?,
                    )
                    .await?;
            }
            ClientMessage::OfferDraw { room_id, player_id } => {
                self.offer_draw_usecase
                    .execute(
                        RoomId::new(room_id)?,
                        PlayerId::new(player_id)?,
                        session.connection_id().clone(),
                    )
                    .await?;
            }
            ClientMessage::RespondToDraw {
                room_id,
                accepted,
                player_id,
            } => {
                self.respond_to_draw_usecase
                    .execute(RoomId::new(room_id)?, PlayerId::new(player_id)?, accepted)
                    .await?;
            }
            ClientMessage::Resign { room_id, player_id } => {
                self.resign_usecase
                    .execute(RoomId::new(room_id)?, PlayerId::new(player_id)?)
                    .await?;
            }
            ClientMessage::GameOver {
                room_id,
                result,
                winner_id,
            } => {
                // 空の winnerId は勝者なしとして扱い、終局自体は中継する
                let winner_id = winner_id
                    .filter(|id| !id.trim().is_empty())
                    .map(PlayerId::new)
                    .transpose()?;
                self.report_game_over_usecase
                    .execute(RoomId::new(room_id)?, result.into(), winner_id)
                    .await?;
            }
        }
        Ok(())
    }
}

fn event_kind(message: &ClientMessage) -> &'static str {
    match message {
        ClientMessage::JoinGame { .. } => "join-game",
        ClientMessage::Move { .. } => "move",
        ClientMessage::ChatMessage { .. } => "chat-message",
        ClientMessage::OfferDraw { .. } => "offer-draw",
        ClientMessage::RespondToDraw { .. } => "respond-to-draw",
        ClientMessage::Resign { .. } => "resign",
        ClientMessage::GameOver { .. } => "game-over",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, GameResult, Notification, RoomStatus},
        infrastructure::dto::websocket::GameOverResultDto,
        usecase::test_support::{Fixture, conn, room_id},
    };

    fn router(fixture: &Fixture) -> EventRouter {
        EventRouter::new(
            fixture.repository(),
            fixture.pusher(),
            fixture.records(),
            fixture.clock.clone(),
        )
    }

    fn join(room: &str, player: &str, name: &str) -> ClientMessage {
        ClientMessage::JoinGame {
            room_id: room.to_string(),
            player_id: player.to_string(),
            player_name: name.to_string(),
        }
    }

    fn session(id: &str) -> ConnectionSession {
        ConnectionSession::new(ConnectionId::new(id.to_string()).unwrap())
    }

    #[tokio::test]
    async fn test_join_binds_session() {
        // テスト項目: join-game を受け付けるとセッションがプレイヤーに紐づく
        // given (前提条件):
        let fixture = Fixture::new();
        let router = router(&fixture);
        let mut alice = session("c1");

        // when (操作):
        router.dispatch(&mut alice, join("R1", "a", "Alice")).await;

        // then (期待する結果):
        let identity = alice.identity().unwrap();
        assert_eq!(identity.room_id.as_str(), "R1");
        assert_eq!(identity.player_id.as_str(), "a");
        assert!(!identity.spectator);
        assert_eq!(fixture.pusher.kinds(&conn("c1"))[0], "color-assigned");
    }

    #[tokio::test]
    async fn test_join_with_blank_player_id_is_dropped() {
        // テスト項目: 空の player_id での join-game は破棄され、Room も作られない
        // given (前提条件):
        let fixture = Fixture::new();
        let router = router(&fixture);
        let mut alice = session("c1");

        // when (操作):
        router.dispatch(&mut alice, join("R1", "  ", "Alice")).await;

        // then (期待する結果):
        assert!(alice.identity().is_none());
        assert_eq!(fixture.repository().count().await, 0);
        assert!(fixture.pusher.received(&conn("c1")).is_empty());
    }

    #[tokio::test]
    async fn test_events_for_unknown_room_are_ignored() {
        // テスト項目: 存在しない Room へのイベントは何も起こさない
        // given (前提条件):
        let fixture = Fixture::new();
        let router = router(&fixture);
        let mut alice = session("c1");

        // when (操作):
        router
            .dispatch(
                &mut alice,
                ClientMessage::Resign {
                    room_id: "ghost".to_string(),
                    player_id: "a".to_string(),
                },
            )
            .await;

        // then (期待する結果):
        assert_eq!(fixture.repository().count().await, 0);
        assert!(fixture.pusher.received(&conn("c1")).is_empty());
    }

    #[tokio::test]
    async fn test_game_over_is_routed_with_winner() {
        // テスト項目: game-over は勝者付きで全員に game-end として届く
        // given (前提条件):
        let fixture = Fixture::new();
        let router = router(&fixture);
        let mut alice = session("c1");
        let mut bob = session("c2");
        router.dispatch(&mut alice, join("R1", "a", "Alice")).await;
        router.dispatch(&mut bob, join("R1", "b", "Bob")).await;
        fixture.pusher.clear();

        // when (操作):
        router
            .dispatch(
                &mut alice,
                ClientMessage::GameOver {
                    room_id: "R1".to_string(),
                    result: GameOverResultDto::Checkmate,
                    winner_id: Some("a".to_string()),
                },
            )
            .await;

        // then (期待する結果):
        match &fixture.pusher.received(&conn("c2"))[0] {
            Notification::GameEnd(game_end) => {
                assert_eq!(game_end.result, GameResult::Checkmate);
                assert_eq!(game_end.message, "Checkmate! Alice wins!");
            }
            other => panic!("unexpected notification: {:?}", other),
        }
        let shared = fixture.repository().find(&room_id("R1")).await.unwrap();
        assert_eq!(shared.lock().await.status(), RoomStatus::Finished);
    }

    #[tokio::test]
    async fn test_join_with_long_name_is_admitted() {
        // テスト項目: 長い表示名でも join-game は受け付けられ、Room が作られる
        // given (前提条件):
        let fixture = Fixture::new();
        let router = router(&fixture);
        let mut alice = session("c1");
        let long_name = "A".repeat(33);

        // when (操作):
        router.dispatch(&mut alice, join("R1", "a", &long_name)).await;

        // then (期待する結果):
        assert!(alice.identity().is_some());
        assert_eq!(fixture.repository().count().await, 1);
        assert_eq!(
            fixture.pusher.kinds(&conn("c1")),
            vec!["color-assigned", "player-joined"]
        );
    }

    #[tokio::test]
    async fn test_long_chat_text_is_broadcast() {
        // テスト項目: 長いチャット本文と長い送信者名もそのまま全員に届く
        // given (前提条件):
        let fixture = Fixture::new();
        let router = router(&fixture);
        let mut alice = session("c1");
        router.dispatch(&mut alice, join("R1", "a", "Alice")).await;
        fixture.pusher.clear();
        let text = "x".repeat(1_001);
        let sender_name = "B".repeat(40);

        // when (操作):
        router
            .dispatch(
                &mut alice,
                ClientMessage::ChatMessage {
                    room_id: "R1".to_string(),
                    text: text.clone(),
                    sender_name: sender_name.clone(),
                    timestamp: None,
                },
            )
            .await;

        // then (期待する結果):
        match &fixture.pusher.received(&conn("c1"))[..] {
            [Notification::Chat(message)] => {
                assert_eq!(message.text.as_str(), text);
                assert_eq!(message.sender_name.as_str(), sender_name);
            }
            other => panic!("unexpected notifications: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ids_with_whitespace_are_distinct() {
        // テスト項目: 空白付きの Room ID / Player ID は別の Room・別のプレイヤーとして扱われ、座席を奪えない
        // given (前提条件):
        let fixture = Fixture::new();
        let router = router(&fixture);
        let mut alice = session("c1");
        let mut other = session("c2");
        router.dispatch(&mut alice, join("R1", "a", "Alice")).await;

        // when (操作):
        router.dispatch(&mut other, join("R1 ", " a", "Other")).await;

        // then (期待する結果):
        assert_eq!(fixture.repository().count().await, 2);
        assert_eq!(
            fixture.pusher.kinds(&conn("c2")),
            vec!["color-assigned", "player-joined"]
        );
        let shared = fixture.repository().find(&room_id("R1")).await.unwrap();
        let room = shared.lock().await;
        assert_eq!(room.players().len(), 1);
        assert_eq!(room.players()[0].connection_id, conn("c1"));
    }

    #[tokio::test]
    async fn test_game_over_with_empty_winner_is_relayed() {
        // テスト項目: winnerId が空文字の game-over も勝者なしの game-end として届く
        // given (前提条件):
        let fixture = Fixture::new();
        let router = router(&fixture);
        let mut alice = session("c1");
        let mut bob = session("c2");
        router.dispatch(&mut alice, join("R1", "a", "Alice")).await;
        router.dispatch(&mut bob, join("R1", "b", "Bob")).await;
        fixture.pusher.clear();

        // when (操作):
        router
            .dispatch(
                &mut alice,
                ClientMessage::GameOver {
                    room_id: "R1".to_string(),
                    result: GameOverResultDto::Other,
                    winner_id: Some(String::new()),
                },
            )
            .await;

        // then (期待する結果):
        match &fixture.pusher.received(&conn("c2"))[..] {
            [Notification::GameEnd(game_end)] => {
                assert_eq!(game_end.winner_id, None);
                assert_eq!(game_end.message, "Game over.");
            }
            other => panic!("unexpected notifications: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disconnect_marks_player_offline() {
        // テスト項目: 接続が閉じるとプレイヤーは切断扱いになり、相手に通知される
        // given (前提条件):
        let fixture = Fixture::new();
        let router = router(&fixture);
        let mut alice = session("c1");
        let mut bob = session("c2");
        router.dispatch(&mut alice, join("R1", "a", "Alice")).await;
        router.dispatch(&mut bob, join("R1", "b", "Bob")).await;
        fixture.pusher.clear();

        // when (操作):
        router.disconnect(&alice).await;

        // then (期待する結果):
        assert_eq!(fixture.pusher.kinds(&conn("c2")), vec!["player-disconnected"]);
    }
}
