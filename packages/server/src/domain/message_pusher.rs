//! MessagePusher trait 定義
//!
//! ドメイン層が必要とする「接続中のクライアントへ通知を届ける」ためのインターフェースです。
//! 通知はドメインの型（`Notification`）で表現し、ワイヤ形式への変換は
//! Infrastructure 層の実装が担います（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    Board, BoardState, ChatMessage, ChessMove, Color, ConnectionId, GameEnd, MessagePushError,
    Player, PlayerId, PlayerName,
};

/// クライアントへのメッセージ送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// サーバーからクライアントへの通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// 入室（再入室）したプレイヤーへの色の通知
    ColorAssigned { color: Color },
    /// 新しいプレイヤーが着席した
    PlayerJoined {
        player: Player,
        players: Vec<Player>,
        game_started: bool,
    },
    /// 2 人揃って対局が始まった
    GameStart {
        players: Vec<Player>,
        initial_board_state: BoardState,
    },
    /// 再接続・途中参加した接続だけに送る現在の状態
    GameState {
        board: Board,
        players: Vec<Player>,
        game_started: bool,
        as_spectator: bool,
        messages: Vec<ChatMessage>,
    },
    /// 観戦者として入室した
    SpectatorMode,
    /// 相手の指し手
    MoveMade {
        chess_move: ChessMove,
        player_id: PlayerId,
        board_state: BoardState,
    },
    /// チャット
    Chat(ChatMessage),
    DrawOffered { player_id: PlayerId },
    DrawDeclined { player_id: PlayerId },
    GameEnd(GameEnd),
    PlayerDisconnected {
        player_id: PlayerId,
        player_name: PlayerName,
    },
}

impl Notification {
    /// ログ出力用の種別名
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::ColorAssigned { .. } => "color-assigned",
            Notification::PlayerJoined { .. } => "player-joined",
            Notification::GameStart { .. } => "game-start",
            Notification::GameState { .. } => "game-state",
            Notification::SpectatorMode => "spectator-mode",
            Notification::MoveMade { .. } => "move-made",
            Notification::Chat(_) => "chat-message",
            Notification::DrawOffered { .. } => "draw-offered",
            Notification::DrawDeclined { .. } => "draw-declined",
            Notification::GameEnd(_) => "game-end",
            Notification::PlayerDisconnected { .. } => "player-disconnected",
        }
    }
}

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、WebSocket などの具体的な送信手段には依存しない。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続に通知を送る
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に通知を送る（一部の送信失敗は許容する）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}
