//! Message formatting utilities for client display.

use chrono::{DateTime, Local};
use gambit_server::infrastructure::dto::websocket::{
    ChatMessageDto, ColorDto, GameResultDto, PlayerDto, ServerMessage,
};

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one server event
    ///
    /// # Arguments
    ///
    /// * `message` - The decoded server event
    /// * `me` - The player id of this client (to mark as "me")
    pub fn format_server_message(message: &ServerMessage, me: &str) -> String {
        match message {
            ServerMessage::ColorAssigned { color } => {
                format!("\nYou play {}.\n", color_name(*color))
            }
            ServerMessage::PlayerJoined {
                player,
                game_started,
                ..
            } => {
                let suffix = if *game_started { " (game started)" } else { "" };
                format!(
                    "\n+ {} joined as {}{}\n",
                    display_player(player, me),
                    color_name(player.color),
                    suffix
                )
            }
            ServerMessage::GameStart {
                players,
                initial_board_state,
            } => format!(
                "\n\n{}\nGame started!\n{}position: {}\n{}\n",
                RULE,
                Self::format_players(players, me),
                initial_board_state,
                RULE
            ),
            ServerMessage::GameState {
                board_state,
                moves,
                players,
                game_started,
                as_spectator,
                messages,
            } => {
                let mut output = format!("\n\n{}\n", RULE);
                if as_spectator.unwrap_or(false) {
                    output.push_str("Watching as a spectator\n");
                }
                output.push_str(if *game_started {
                    "Game in progress\n"
                } else {
                    "Waiting for players\n"
                });
                output.push_str(&Self::format_players(players, me));
                let history: Vec<String> = moves.iter().map(move_text).collect();
                output.push_str(&format!("moves: {}\n", history.join(" ")));
                output.push_str(&format!("position: {}\n", board_state));
                for message in messages {
                    output.push_str(&Self::format_chat_message(message));
                }
                output.push_str(RULE);
                output.push('\n');
                output
            }
            ServerMessage::SpectatorMode => {
                "\nThe room is full, you are watching as a spectator.\n".to_string()
            }
            ServerMessage::MoveMade {
                r#move,
                player_id,
                board_state,
            } => format!(
                "\n{} played {}\nposition: {}\n",
                player_id,
                move_text(r#move),
                board_state
            ),
            ServerMessage::ChatMessage {
                text,
                sender_name,
                timestamp,
            } => format!(
                "\n[{}] {}: {}\n",
                format_time(*timestamp),
                sender_name,
                text
            ),
            ServerMessage::DrawOffered { player_id } => {
                format!("\n{} offers a draw. Type /accept or /decline.\n", player_id)
            }
            ServerMessage::DrawDeclined { player_id } => {
                format!("\n{} declined the draw.\n", player_id)
            }
            ServerMessage::GameEnd {
                result, message, ..
            } => format!(
                "\n\n{}\nGame over ({}): {}\n{}\n",
                RULE,
                result_name(*result),
                message,
                RULE
            ),
            ServerMessage::PlayerDisconnected {
                player_id,
                player_name,
            } => format!("\n- {} ({}) disconnected\n", player_name, player_id),
        }
    }

    /// Format a frame that is not a known server event
    pub fn format_raw_message(text: &str) -> String {
        format!("\n{}\n", text)
    }

    /// Format the seated players, white first
    fn format_players(players: &[PlayerDto], me: &str) -> String {
        players
            .iter()
            .map(|p| {
                let status = if p.connected { "" } else { " [offline]" };
                format!(
                    "  {}: {}{}\n",
                    color_name(p.color),
                    display_player(p, me),
                    status
                )
            })
            .collect()
    }

    fn format_chat_message(message: &ChatMessageDto) -> String {
        format!(
            "  [{}] {}: {}\n",
            format_time(message.timestamp),
            message.sender_name,
            message.text
        )
    }
}

fn display_player(player: &PlayerDto, me: &str) -> String {
    if player.player_id == me {
        format!("{} (me)", player.name)
    } else {
        player.name.clone()
    }
}

fn color_name(color: ColorDto) -> &'static str {
    match color {
        ColorDto::White => "white",
        ColorDto::Black => "black",
    }
}

fn result_name(result: GameResultDto) -> &'static str {
    match result {
        GameResultDto::Checkmate => "checkmate",
        GameResultDto::Stalemate => "stalemate",
        GameResultDto::Threefold => "threefold repetition",
        GameResultDto::Insufficient => "insufficient material",
        GameResultDto::FiftyMove => "fifty-move rule",
        GameResultDto::Other => "other",
        GameResultDto::Draw => "draw",
        GameResultDto::Resignation => "resignation",
    }
}

fn move_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Unix ミリ秒をローカル時刻の `HH:MM:SS` に変換
fn format_time(timestamp_millis: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_millis)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}
