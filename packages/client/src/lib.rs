//! Terminal client for Gambit chess rooms.
//!
//! Joins a room over WebSocket, prints every server event and turns typed lines
//! into moves, chat and game events. Reconnects with the same player id when the
//! connection drops, which restores the seat on the server.

mod command;
pub mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
pub use session::ClientIdentity;
