//! WebSocket client session management.

use futures_util::{Sink, SinkExt, StreamExt};
use gambit_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{
    command::{Command, HELP, parse_command},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::print_with_prompt};

/// Who this client joins as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub room_id: String,
    pub player_id: String,
    pub name: String,
}

impl ClientIdentity {
    pub fn prompt(&self) -> String {
        format!("{}@{}> ", self.name, self.room_id)
    }

    fn join_message(&self) -> ClientMessage {
        ClientMessage::JoinGame {
            room_id: self.room_id.clone(),
            player_id: self.player_id.clone(),
            player_name: self.name.clone(),
        }
    }
}

/// Run one WebSocket client session
///
/// Sends `join-game` as soon as the connection is open; the server treats a
/// known player id as a reconnection. Returns `Ok(())` when the user quits.
pub async fn run_client_session(
    url: &str,
    identity: &ClientIdentity,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        tungstenite::Error::Url(_) => ClientError::InvalidUrl(url.to_string()),
        other => ClientError::ConnectionError(other.to_string()),
    })?;

    tracing::info!("Connected to {}", url);
    println!(
        "\nYou are '{}' in room '{}'. Type /help for commands, Ctrl+C to exit.\n",
        identity.name, identity.room_id
    );

    let (mut write, mut read) = ws_stream.split();
    let prompt = identity.prompt();

    send_message(&mut write, &identity.join_message()).await?;

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let formatted = match serde_json::from_str::<ServerMessage>(text.as_str()) {
                        Ok(message) => {
                            MessageFormatter::format_server_message(&message, &identity.player_id)
                        }
                        // If parsing fails, display as raw text
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print_with_prompt(&formatted, &prompt);
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionLost("closed by server".to_string()));
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionLost(e.to_string()));
                }
                Some(Ok(_)) => {}
            },
            line = input.recv() => {
                // 入力スレッドが終了した（Ctrl+C / Ctrl+D）
                let Some(line) = line else {
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                };

                match parse_command(&line, identity) {
                    Ok(Command::Send(message)) => send_message(&mut write, &message).await?,
                    Ok(Command::Help) => print_with_prompt(&format!("{}\n", HELP), &prompt),
                    Ok(Command::Quit) => {
                        write.send(Message::Close(None)).await.ok();
                        return Ok(());
                    }
                    Err(e) => print_with_prompt(&format!("{}\n", e), &prompt),
                }
            }
        }
    }
}

async fn send_message<S>(write: &mut S, message: &ClientMessage) -> Result<(), ClientError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let json = serde_json::to_string(message)
        .map_err(|e| ClientError::InvalidCommand(format!("Failed to serialize message: {}", e)))?;

    write.send(Message::Text(json.into())).await.map_err(|e| {
        tracing::warn!("Failed to send message: {}", e);
        ClientError::ConnectionLost(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_message_uses_identity() {
        // テスト項目: 接続時の join-game はクライアントの識別情報から作られる
        // given (前提条件):
        let identity = ClientIdentity {
            room_id: "R1".to_string(),
            player_id: "a".to_string(),
            name: "Alice".to_string(),
        };

        // when (操作):
        let message = identity.join_message();

        // then (期待する結果):
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            serde_json::json!({
                "type": "join-game",
                "roomId": "R1",
                "playerId": "a",
                "playerName": "Alice"
            })
        );
        assert_eq!(identity.prompt(), "Alice@R1> ");
    }
}
