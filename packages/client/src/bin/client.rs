//! Terminal client for Gambit chess rooms.
//!
//! Joins a room as a player (or spectator once both seats are taken), prints
//! every room event and sends moves, chat and game events typed at the prompt.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin gambit-client -- --room-id R1 --player-id alice --name Alice
//! cargo run --bin gambit-client -- -r R1 -p bob -n Bob
//! ```

use clap::Parser;

use gambit_client::{ClientIdentity, run_client};
use gambit_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "gambit-client")]
#[command(about = "Terminal client for real-time chess rooms", long_about = None)]
struct Args {
    /// Room to join (created on first join)
    #[arg(short = 'r', long)]
    room_id: String,

    /// Stable player id; reuse it to get the same seat back after a reconnect
    #[arg(short = 'p', long)]
    player_id: String,

    /// Display name
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(
        env!("CARGO_BIN_NAME"),
        &["gambit_client", "gambit_shared"],
        "info",
    );

    let args = Args::parse();
    let identity = ClientIdentity {
        room_id: args.room_id,
        player_id: args.player_id,
        name: args.name,
    };

    if let Err(e) = run_client(args.url, identity).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
