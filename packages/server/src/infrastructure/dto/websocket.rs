//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged by `type` (kebab-case) with camelCase fields,
//! e.g. `{"type":"join-game","roomId":"R1","playerId":"p1","playerName":"Alice"}`.

use serde::{Deserialize, Serialize};

/// Seat colour on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorDto {
    White,
    Black,
}

/// Result tag a client may report with `game-over`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameOverResultDto {
    Checkmate,
    Stalemate,
    Threefold,
    Insufficient,
    FiftyMove,
    Other,
}

/// Result tag carried by `game-end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameResultDto {
    Checkmate,
    Stalemate,
    Threefold,
    Insufficient,
    FiftyMove,
    Other,
    Draw,
    Resignation,
}

/// Seated player as seen by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub player_id: String,
    pub name: String,
    pub color: ColorDto,
    pub connected: bool,
}

/// Chat history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub text: String,
    pub sender_name: String,
    pub timestamp: i64,
}

/// Client → Server events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    JoinGame {
        room_id: String,
        player_id: String,
        player_name: String,
    },
    Move {
        room_id: String,
        r#move: serde_json::Value,
        player_id: String,
        board_state: String,
    },
    ChatMessage {
        room_id: String,
        text: String,
        sender_name: String,
        /// Client-side send time. Informational only; history uses the server clock.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },
    OfferDraw {
        room_id: String,
        player_id: String,
    },
    RespondToDraw {
        room_id: String,
        accepted: bool,
        player_id: String,
    },
    Resign {
        room_id: String,
        player_id: String,
    },
    GameOver {
        room_id: String,
        result: GameOverResultDto,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner_id: Option<String>,
    },
}

/// Server → Client events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    ColorAssigned {
        color: ColorDto,
    },
    PlayerJoined {
        player: PlayerDto,
        players: Vec<PlayerDto>,
        game_started: bool,
    },
    GameStart {
        players: Vec<PlayerDto>,
        initial_board_state: String,
    },
    GameState {
        board_state: String,
        moves: Vec<serde_json::Value>,
        players: Vec<PlayerDto>,
        game_started: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        as_spectator: Option<bool>,
        messages: Vec<ChatMessageDto>,
    },
    SpectatorMode,
    MoveMade {
        r#move: serde_json::Value,
        player_id: String,
        board_state: String,
    },
    ChatMessage {
        text: String,
        sender_name: String,
        timestamp: i64,
    },
    DrawOffered {
        player_id: String,
    },
    DrawDeclined {
        player_id: String,
    },
    GameEnd {
        result: GameResultDto,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner_id: Option<String>,
        message: String,
    },
    PlayerDisconnected {
        player_id: String,
        player_name: String,
    },
}
