//! Conversion logic between DTOs and domain entities.

use gambit_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ChatMessage, Color, GameResult, Notification, Player, Room, Spectator,
};
use crate::infrastructure::dto::{
    http::{PlayerDetailDto, RoomDetailDto, RoomSummaryDto, SpectatorDetailDto},
    websocket::{
        ChatMessageDto, ColorDto, GameOverResultDto, GameResultDto, PlayerDto, ServerMessage,
    },
};

// ========================================
// DTO → Domain
// ========================================

impl From<GameOverResultDto> for GameResult {
    fn from(dto: GameOverResultDto) -> Self {
        match dto {
            GameOverResultDto::Checkmate => GameResult::Checkmate,
            GameOverResultDto::Stalemate => GameResult::Stalemate,
            GameOverResultDto::Threefold => GameResult::Threefold,
            GameOverResultDto::Insufficient => GameResult::Insufficient,
            GameOverResultDto::FiftyMove => GameResult::FiftyMove,
            GameOverResultDto::Other => GameResult::Other,
        }
    }
}

// ========================================
// Domain → WebSocket DTO
// ========================================

impl From<Color> for ColorDto {
    fn from(color: Color) -> Self {
        match color {
            Color::White => ColorDto::White,
            Color::Black => ColorDto::Black,
        }
    }
}

impl From<GameResult> for GameResultDto {
    fn from(result: GameResult) -> Self {
        match result {
            GameResult::Checkmate => GameResultDto::Checkmate,
            GameResult::Stalemate => GameResultDto::Stalemate,
            GameResult::Threefold => GameResultDto::Threefold,
            GameResult::Insufficient => GameResultDto::Insufficient,
            GameResult::FiftyMove => GameResultDto::FiftyMove,
            GameResult::Other => GameResultDto::Other,
            GameResult::Draw => GameResultDto::Draw,
            GameResult::Resignation => GameResultDto::Resignation,
        }
    }
}

impl From<&Player> for PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.id.as_str().to_string(),
            name: player.name.as_str().to_string(),
            color: player.color.into(),
            connected: player.connected,
        }
    }
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            text: message.text.as_str().to_string(),
            sender_name: message.sender_name.as_str().to_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

fn player_dtos(players: &[Player]) -> Vec<PlayerDto> {
    players.iter().map(PlayerDto::from).collect()
}

impl From<&Notification> for ServerMessage {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::ColorAssigned { color } => ServerMessage::ColorAssigned {
                color: (*color).into(),
            },
            Notification::PlayerJoined {
                player,
                players,
                game_started,
            } => ServerMessage::PlayerJoined {
                player: player.into(),
                players: player_dtos(players),
                game_started: *game_started,
            },
            Notification::GameStart {
                players,
                initial_board_state,
            } => ServerMessage::GameStart {
                players: player_dtos(players),
                initial_board_state: initial_board_state.as_str().to_string(),
            },
            Notification::GameState {
                board,
                players,
                game_started,
                as_spectator,
                messages,
            } => ServerMessage::GameState {
                board_state: board.position.as_str().to_string(),
                moves: board.moves.iter().map(|m| m.as_value().clone()).collect(),
                players: player_dtos(players),
                game_started: *game_started,
                as_spectator: as_spectator.then_some(true),
                messages: messages.iter().map(ChatMessageDto::from).collect(),
            },
            Notification::SpectatorMode => ServerMessage::SpectatorMode,
            Notification::MoveMade {
                chess_move,
                player_id,
                board_state,
            } => ServerMessage::MoveMade {
                r#move: chess_move.as_value().clone(),
                player_id: player_id.as_str().to_string(),
                board_state: board_state.as_str().to_string(),
            },
            Notification::Chat(message) => ServerMessage::ChatMessage {
                text: message.text.as_str().to_string(),
                sender_name: message.sender_name.as_str().to_string(),
                timestamp: message.timestamp.value(),
            },
            Notification::DrawOffered { player_id } => ServerMessage::DrawOffered {
                player_id: player_id.as_str().to_string(),
            },
            Notification::DrawDeclined { player_id } => ServerMessage::DrawDeclined {
                player_id: player_id.as_str().to_string(),
            },
            Notification::GameEnd(game_end) => ServerMessage::GameEnd {
                result: game_end.result.into(),
                winner_id: game_end.winner_id.as_ref().map(|id| id.as_str().to_string()),
                message: game_end.message.clone(),
            },
            Notification::PlayerDisconnected {
                player_id,
                player_name,
            } => ServerMessage::PlayerDisconnected {
                player_id: player_id.as_str().to_string(),
                player_name: player_name.as_str().to_string(),
            },
        }
    }
}

// ========================================
// Domain → HTTP DTO
// ========================================

impl From<&Player> for PlayerDetailDto {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.id.as_str().to_string(),
            name: player.name.as_str().to_string(),
            color: player.color.as_str().to_string(),
            connected: player.connected,
        }
    }
}

impl From<&Spectator> for SpectatorDetailDto {
    fn from(spectator: &Spectator) -> Self {
        Self {
            player_id: spectator.id.as_str().to_string(),
            name: spectator.name.as_str().to_string(),
            connected: spectator.connected,
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            status: room.status().as_str().to_string(),
            players: room
                .players()
                .iter()
                .map(|p| p.id.as_str().to_string())
                .collect(),
            spectator_count: room.spectators().len(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            status: room.status().as_str().to_string(),
            players: room.players().iter().map(PlayerDetailDto::from).collect(),
            spectators: room
                .spectators()
                .iter()
                .map(SpectatorDetailDto::from)
                .collect(),
            board_state: room.board().position.as_str().to_string(),
            move_count: room.board().moves.len(),
            message_count: room.messages().len(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            last_activity_at: timestamp_to_rfc3339(room.last_activity_at().value()),
        }
    }
}
