//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub status: String,
    pub players: Vec<String>,
    pub spectator_count: usize,
    pub created_at: String,
}

/// Seated player detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetailDto {
    pub player_id: String,
    pub name: String,
    pub color: String,
    pub connected: bool,
}

/// Spectator detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectatorDetailDto {
    pub player_id: String,
    pub name: String,
    pub connected: bool,
}

/// Room detail for `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub status: String,
    pub players: Vec<PlayerDetailDto>,
    pub spectators: Vec<SpectatorDetailDto>,
    pub board_state: String,
    pub move_count: usize,
    pub message_count: usize,
    pub created_at: String,
    pub last_activity_at: String,
}
