//! WebSocket game-room server: handlers, event routing and connection sessions.

mod handler;
pub mod router;
mod server;
pub mod session;
mod signal;
pub mod state;

pub use server::{Server, ServerConfig};
pub use signal::shutdown_signal;
