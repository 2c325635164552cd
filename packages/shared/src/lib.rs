//! Utilities shared by the Gambit server and client.

pub mod logger;
pub mod time;
