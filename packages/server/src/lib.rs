//! Real-time chess game-room coordinator.
//!
//! This library seats players into rooms, relays moves and chat between them,
//! handles draw offers, resignation and game end, and keeps room state across
//! reconnects. The browser (or `gambit-client`) owns the chess rules.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
