//! Infrastructure layer: concrete implementations of the domain interfaces and wire DTOs.

pub mod dto;
pub mod game_record;
pub mod message_pusher;
pub mod repository;
