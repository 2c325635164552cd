//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory},
    infrastructure::dto::websocket::ClientMessage,
    ui::{session::ConnectionSession, state::AppState},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        let connection_id = ConnectionIdFactory::generate();
        let span = tracing::info_span!("connection", id = %connection_id);
        handle_socket(socket, state, connection_id).instrument(span)
    })
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Messages enqueued by the usecases (via `MessagePusher`) reach this connection through here.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(
        async move {
            while let Some(msg) = rx.recv().await {
                if sender.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }
        }
        .in_current_span(),
    )
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(connection_id.clone(), tx)
        .await;
    tracing::info!("Connection opened");

    let router = state.router.clone();
    let mut session = ConnectionSession::new(connection_id.clone());

    // イベントは接続ごとに受信順で 1 件ずつ処理する
    let mut recv_task = tokio::spawn(
        async move {
            while let Some(msg) = receiver.next().await {
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::warn!("WebSocket error: {}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(event) => router.dispatch(&mut session, event).await,
                        Err(e) => tracing::warn!("Dropped unparseable frame: {}", e),
                    },
                    Message::Ping(_) => {
                        tracing::trace!("Received ping");
                    }
                    Message::Close(_) => {
                        tracing::info!("Client requested close");
                        break;
                    }
                    _ => {}
                }
            }
            session
        }
        .in_current_span(),
    );

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    let session = tokio::select! {
        result = &mut recv_task => {
            send_task.abort();
            result.ok()
        }
        _ = &mut send_task => {
            recv_task.abort();
            None
        }
    };

    let session = session.unwrap_or_else(|| ConnectionSession::new(connection_id));
    if let Some(identity) = session.identity() {
        tracing::info!(
            "Player '{}' left room '{}'",
            identity.player_id,
            identity.room_id
        );
    }
    state.router.disconnect(&session).await;
    tracing::info!("Connection closed");
}
