//! 終局した対局の記録と、その保存先の trait 定義
//!
//! 永続化そのものは外部のデータストアの責務です。ここでは保存呼び出しの形だけを定めます。

use async_trait::async_trait;

use super::{
    BoardState, ChessMove, Color, GameEnd, GameRecordError, GameResult, PlayerId, PlayerName,
    Room, RoomId, Timestamp,
};

/// 対局者の記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPlayer {
    pub id: PlayerId,
    pub name: PlayerName,
    pub color: Color,
}

/// 終局した対局の記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub room_id: RoomId,
    pub players: Vec<RecordedPlayer>,
    pub result: GameResult,
    pub winner_id: Option<PlayerId>,
    pub message: String,
    pub moves: Vec<ChessMove>,
    pub final_position: BoardState,
    pub finished_at: Timestamp,
}

impl GameRecord {
    /// 終局時点の Room から記録を作成
    pub fn from_room(room: &Room, game_end: &GameEnd, finished_at: Timestamp) -> Self {
        Self {
            room_id: room.id.clone(),
            players: room
                .players()
                .iter()
                .map(|p| RecordedPlayer {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    color: p.color,
                })
                .collect(),
            result: game_end.result,
            winner_id: game_end.winner_id.clone(),
            message: game_end.message.clone(),
            moves: room.board().moves.clone(),
            final_position: room.board().position.clone(),
            finished_at,
        }
    }
}

/// 対局記録の保存先
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRecordStore: Send + Sync {
    async fn save(&self, record: GameRecord) -> Result<(), GameRecordError>;
}
