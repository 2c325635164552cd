//! Parsing of typed input lines into client events.

use gambit_server::infrastructure::dto::websocket::{ClientMessage, GameOverResultDto};
use gambit_shared::time::get_unix_timestamp_millis;

use crate::{error::ClientError, session::ClientIdentity};

pub const HELP: &str = "\
Commands:
  <text>                      send a chat message
  /move <move> <fen>          relay a move (SAN or JSON object) and the resulting position
  /draw                       offer a draw
  /accept | /decline          answer a draw offer
  /resign                     resign the game
  /gameover <result> [winner] report checkmate|stalemate|threefold|insufficient|fifty-move|other
  /help                       show this help
  /quit                       leave";

/// What a typed line asks the client to do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Send(ClientMessage),
    Help,
    Quit,
}

/// Turn one input line into a command
pub fn parse_command(line: &str, identity: &ClientIdentity) -> Result<Command, ClientError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Send(ClientMessage::ChatMessage {
            room_id: identity.room_id.clone(),
            text: line.to_string(),
            sender_name: identity.name.clone(),
            timestamp: Some(get_unix_timestamp_millis()),
        }));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };
    let room_id = identity.room_id.clone();
    let player_id = identity.player_id.clone();

    let message = match name {
        "quit" | "exit" => return Ok(Command::Quit),
        "help" => return Ok(Command::Help),
        "move" => {
            let (chess_move, fen) = args
                .split_once(char::is_whitespace)
                .map(|(m, fen)| (m, fen.trim()))
                .filter(|(_, fen)| !fen.is_empty())
                .ok_or_else(|| usage("/move <move> <fen>"))?;
            ClientMessage::Move {
                room_id,
                r#move: parse_move(chess_move),
                player_id,
                board_state: fen.to_string(),
            }
        }
        "draw" => ClientMessage::OfferDraw { room_id, player_id },
        "accept" | "decline" => ClientMessage::RespondToDraw {
            room_id,
            accepted: name == "accept",
            player_id,
        },
        "resign" => ClientMessage::Resign { room_id, player_id },
        "gameover" => {
            let mut parts = args.split_whitespace();
            let result = parts
                .next()
                .ok_or_else(|| usage("/gameover <result> [winnerId]"))?;
            let result: GameOverResultDto =
                serde_json::from_value(serde_json::Value::String(result.to_string()))
                    .map_err(|_| {
                        ClientError::InvalidCommand(format!("Unknown game result '{}'", result))
                    })?;
            ClientMessage::GameOver {
                room_id,
                result,
                winner_id: parts.next().map(str::to_string),
            }
        }
        other => {
            return Err(ClientError::InvalidCommand(format!(
                "Unknown command '/{}' (try /help)",
                other
            )));
        }
    };

    Ok(Command::Send(message))
}

/// JSON オブジェクトならそのまま、それ以外は SAN などの文字列として扱う
fn parse_move(raw: &str) -> serde_json::Value {
    if raw.starts_with('{')
        && let Ok(value) = serde_json::from_str(raw)
    {
        return value;
    }
    serde_json::Value::String(raw.to_string())
}

fn usage(text: &str) -> ClientError {
    ClientError::InvalidCommand(format!("Usage: {}", text))
}
