//! Gambit game-room server.
//!
//! Seats players into chess rooms and relays their moves, chat and game events.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin gambit-server
//! cargo run --bin gambit-server -- --host 0.0.0.0 --port 3000 --idle-room-timeout-secs 600
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use gambit_server::{
    infrastructure::{
        game_record::InMemoryGameRecordStore, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
    ui::{Server, ServerConfig},
};
use gambit_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "gambit-server")]
#[command(about = "Real-time chess game-room server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds a room without connected members is kept before it is evicted
    #[arg(long, default_value = "1800")]
    idle_room_timeout_secs: u64,

    /// Seconds between idle-room sweeps
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    reap_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(
        env!("CARGO_BIN_NAME"),
        &["gambit_server", "gambit_shared"],
        "debug",
    );

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. GameRecordStore
    // 4. Server (wires the usecases)
    let repository = Arc::new(InMemoryRoomRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let record_store = Arc::new(InMemoryGameRecordStore::new());

    let config = ServerConfig {
        idle_room_timeout: Duration::from_secs(args.idle_room_timeout_secs),
        reap_interval: Duration::from_secs(args.reap_interval_secs),
    };
    tracing::debug!("Server config: {:?}", config);

    let server = Server::new(
        repository,
        message_pusher,
        record_store,
        Arc::new(SystemClock),
        config,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
