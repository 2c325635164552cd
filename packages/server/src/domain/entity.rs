//! Entities
//!
//! Room は 1 対局ぶんの共有状態（座席・観戦者・盤面・チャット履歴・状態）を持つ集約です。
//! Room への変更はすべてこのモジュールのメソッドを通して行い、不変条件を守ります。
//!
//! - `players.len() <= 2`
//! - `status == Playing` ならば `players.len() == 2`
//! - 一度割り当てた手番色は Room が存在する限り変わらない
//! - 同じ player_id の Player / Spectator は 1 件まで

use std::collections::VecDeque;

use super::value_object::{
    BoardState, ChessMove, ConnectionId, MessageContent, PlayerId, PlayerName, RoomId, Timestamp,
};

/// 1 Room あたりの座席数
pub const SEAT_COUNT: usize = 2;
/// チャット履歴の保持件数
pub const DEFAULT_MESSAGE_CAPACITY: usize = 100;

/// 手番色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// 着席順から色を決める（先着が白）
    pub fn for_seat(seat_index: usize) -> Self {
        if seat_index == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

/// Room のライフサイクル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::Playing => "playing",
            RoomStatus::Finished => "finished",
        }
    }
}

/// 着席しているプレイヤー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub color: Color,
    pub connection_id: ConnectionId,
    pub connected: bool,
}

/// 観戦者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spectator {
    pub id: PlayerId,
    pub name: PlayerName,
    pub connection_id: ConnectionId,
    pub connected: bool,
}

/// チャットメッセージ（追加後は不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: MessageContent,
    pub sender_name: PlayerName,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(text: MessageContent, sender_name: PlayerName, timestamp: Timestamp) -> Self {
        Self {
            text,
            sender_name,
            timestamp,
        }
    }
}

/// 現在の盤面と、それを再現するための指し手履歴
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub position: BoardState,
    pub moves: Vec<ChessMove>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            position: BoardState::initial(),
            moves: Vec::new(),
        }
    }
}

/// 入室処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// 既に着席している player_id の再接続。色は以前のまま
    Reconnected { color: Color },
    /// 新しく着席した。`started_game` はこの着席で対局が始まったかどうか
    Seated { color: Color, started_game: bool },
    /// 座席が埋まっているため観戦者として入室した
    Spectating { rejoined: bool },
}

/// 接続切断でメンバーが離れたことを表す
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    Player { player_id: PlayerId, name: PlayerName },
    Spectator { player_id: PlayerId },
}

/// 対局結果の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Checkmate,
    Stalemate,
    Threefold,
    Insufficient,
    FiftyMove,
    Other,
    Draw,
    Resignation,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::Checkmate => "checkmate",
            GameResult::Stalemate => "stalemate",
            GameResult::Threefold => "threefold",
            GameResult::Insufficient => "insufficient",
            GameResult::FiftyMove => "fifty-move",
            GameResult::Other => "other",
            GameResult::Draw => "draw",
            GameResult::Resignation => "resignation",
        }
    }
}

/// 対局終了の通知内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEnd {
    pub result: GameResult,
    pub winner_id: Option<PlayerId>,
    pub message: String,
}

impl GameEnd {
    /// 合意による引き分け
    pub fn draw_by_agreement() -> Self {
        Self {
            result: GameResult::Draw,
            winner_id: None,
            message: "Game drawn by agreement.".to_string(),
        }
    }

    /// 投了。`winner` は投了したプレイヤーの相手
    pub fn resignation(resigned: &Player, winner: &Player) -> Self {
        Self {
            result: GameResult::Resignation,
            winner_id: Some(winner.id.clone()),
            message: format!("{} resigned. {} wins!", resigned.name, winner.name),
        }
    }

    /// クライアントが検出した終局
    ///
    /// `winner` は (id, 表示名)。着席していない id が報告された場合、表示名には id を使う。
    pub fn reported(result: GameResult, winner: Option<(PlayerId, String)>) -> Self {
        let winner_name = winner.as_ref().map(|(_, name)| name.as_str());
        let message = match (result, winner_name) {
            (GameResult::Checkmate, Some(name)) => format!("Checkmate! {} wins!", name),
            (GameResult::Checkmate, None) => "Checkmate!".to_string(),
            (GameResult::Stalemate, _) => "Game drawn by stalemate.".to_string(),
            (GameResult::Threefold, _) => "Game drawn by threefold repetition.".to_string(),
            (GameResult::Insufficient, _) => {
                "Game drawn due to insufficient material.".to_string()
            }
            (GameResult::FiftyMove, _) => "Game drawn by the fifty-move rule.".to_string(),
            (GameResult::Draw, _) => "Game drawn.".to_string(),
            (GameResult::Resignation, Some(name)) => format!("Game over by resignation. {} wins!", name),
            (GameResult::Other, Some(name)) => format!("Game over. {} wins!", name),
            (GameResult::Other, None) | (GameResult::Resignation, None) => {
                "Game over.".to_string()
            }
        };
        Self {
            result,
            winner_id: winner.map(|(id, _)| id),
            message,
        }
    }
}

/// Room 集約
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    status: RoomStatus,
    players: Vec<Player>,
    spectators: Vec<Spectator>,
    board: Board,
    messages: VecDeque<ChatMessage>,
    message_capacity: usize,
    pending_draw_offer: Option<PlayerId>,
    pub created_at: Timestamp,
    last_activity_at: Timestamp,
    evicted: bool,
}

impl Room {
    /// 空の Room を `Waiting` 状態で作成
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self::with_capacity(id, created_at, DEFAULT_MESSAGE_CAPACITY)
    }

    /// チャット履歴の保持件数を指定して作成
    pub fn with_capacity(id: RoomId, created_at: Timestamp, message_capacity: usize) -> Self {
        Self {
            id,
            status: RoomStatus::Waiting,
            players: Vec::with_capacity(SEAT_COUNT),
            spectators: Vec::new(),
            board: Board::default(),
            messages: VecDeque::with_capacity(message_capacity),
            message_capacity,
            pending_draw_offer: None,
            created_at,
            last_activity_at: created_at,
            evicted: false,
        }
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn spectators(&self) -> &[Spectator] {
        &self.spectators
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn messages(&self) -> impl ExactSizeIterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn last_activity_at(&self) -> Timestamp {
        self.last_activity_at
    }

    pub fn pending_draw_offer(&self) -> Option<&PlayerId> {
        self.pending_draw_offer.as_ref()
    }

    /// 対局が始まったことがあるか（`Playing` または `Finished`）
    pub fn has_started(&self) -> bool {
        self.status != RoomStatus::Waiting
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == player_id)
    }

    /// `player_id` が着席していて相手も着席している場合、その相手を返す
    pub fn opponent_of(&self, player_id: &PlayerId) -> Option<&Player> {
        self.player(player_id)?;
        self.players.iter().find(|p| &p.id != player_id)
    }

    /// プレイヤーまたは観戦者として入室させる
    pub fn admit(
        &mut self,
        player_id: PlayerId,
        name: PlayerName,
        connection_id: ConnectionId,
        now: Timestamp,
    ) -> Admission {
        self.touch(now);

        if let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) {
            player.connection_id = connection_id;
            player.connected = true;
            return Admission::Reconnected {
                color: player.color,
            };
        }

        if self.players.len() < SEAT_COUNT {
            let color = Color::for_seat(self.players.len());
            self.players.push(Player {
                id: player_id,
                name,
                color,
                connection_id,
                connected: true,
            });

            let started_game = self.players.len() == SEAT_COUNT && self.status == RoomStatus::Waiting;
            if started_game {
                self.status = RoomStatus::Playing;
            }
            return Admission::Seated {
                color,
                started_game,
            };
        }

        if let Some(spectator) = self.spectators.iter_mut().find(|s| s.id == player_id) {
            spectator.connection_id = connection_id;
            spectator.connected = true;
            return Admission::Spectating { rejoined: true };
        }

        self.spectators.push(Spectator {
            id: player_id,
            name,
            connection_id,
            connected: true,
        });
        Admission::Spectating { rejoined: false }
    }

    /// 指し手を記録し、現在の盤面を置き換える（合法性は検証しない）
    pub fn record_move(&mut self, chess_move: ChessMove, position: BoardState, now: Timestamp) {
        self.board.moves.push(chess_move);
        self.board.position = position;
        self.touch(now);
    }

    /// チャット履歴に追加する。容量を超えた場合は最も古いものを取り除いて返す
    pub fn add_message(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        self.touch(message.timestamp);
        if self.message_capacity == 0 {
            return Some(message);
        }
        let evicted = if self.messages.len() >= self.message_capacity {
            self.messages.pop_front()
        } else {
            None
        };
        self.messages.push_back(message);
        evicted
    }

    pub fn offer_draw(&mut self, offered_by: PlayerId, now: Timestamp) {
        self.pending_draw_offer = Some(offered_by);
        self.touch(now);
    }

    /// 保留中の引き分け提案を取り出す
    pub fn take_draw_offer(&mut self) -> Option<PlayerId> {
        self.pending_draw_offer.take()
    }

    /// 対局を終了状態にする。今回の呼び出しで終了に遷移した場合 `true`
    ///
    /// 対局が始まっていない（`Waiting`）Room は変更しない。
    pub fn finish(&mut self, now: Timestamp) -> bool {
        if self.status == RoomStatus::Waiting {
            return false;
        }
        self.touch(now);
        self.pending_draw_offer = None;
        if self.status == RoomStatus::Finished {
            return false;
        }
        self.status = RoomStatus::Finished;
        true
    }

    /// 接続が切れたメンバーを `connected = false` にする（座席や履歴は残す）
    pub fn mark_disconnected(
        &mut self,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> Option<Departure> {
        if let Some(player) = self
            .players
            .iter_mut()
            .find(|p| p.connected && &p.connection_id == connection_id)
        {
            player.connected = false;
            let departure = Departure::Player {
                player_id: player.id.clone(),
                name: player.name.clone(),
            };
            self.touch(now);
            return Some(departure);
        }

        if let Some(spectator) = self
            .spectators
            .iter_mut()
            .find(|s| s.connected && &s.connection_id == connection_id)
        {
            spectator.connected = false;
            let departure = Departure::Spectator {
                player_id: spectator.id.clone(),
            };
            self.touch(now);
            return Some(departure);
        }

        None
    }

    /// 接続中の全メンバー（プレイヤー、観戦者の順）の接続 ID
    pub fn connected_connections(&self) -> Vec<ConnectionId> {
        self.players
            .iter()
            .filter(|p| p.connected)
            .map(|p| p.connection_id.clone())
            .chain(
                self.spectators
                    .iter()
                    .filter(|s| s.connected)
                    .map(|s| s.connection_id.clone()),
            )
            .collect()
    }

    /// `exclude` 以外の接続中メンバーの接続 ID
    pub fn connections_except(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.connected_connections()
            .into_iter()
            .filter(|id| id != exclude)
            .collect()
    }

    /// 接続中のプレイヤーの接続 ID
    pub fn connection_of(&self, player_id: &PlayerId) -> Option<ConnectionId> {
        self.player(player_id)
            .filter(|p| p.connected)
            .map(|p| p.connection_id.clone())
    }

    pub fn has_connected_members(&self) -> bool {
        self.players.iter().any(|p| p.connected) || self.spectators.iter().any(|s| s.connected)
    }

    /// 接続中のメンバーがおらず、最後の操作から `timeout_millis` 以上経過しているか
    pub fn is_idle(&self, now: Timestamp, timeout_millis: i64) -> bool {
        !self.has_connected_members() && now.millis_since(self.last_activity_at) >= timeout_millis
    }

    /// Registry から取り除かれた Room として印を付ける
    ///
    /// 削除前にハンドルを取得していた処理は、ロック取得後にこれを確認して Room を作り直す。
    pub fn mark_evicted(&mut self) {
        self.evicted = true;
    }

    pub fn is_evicted(&self) -> bool {
        self.evicted
    }

    fn touch(&mut self, now: Timestamp) {
        if now > self.last_activity_at {
            self.last_activity_at = now;
        }
    }
}
