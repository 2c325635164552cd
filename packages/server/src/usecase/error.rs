//! UseCase layer errors.

use thiserror::Error;

/// 対局中のイベント処理のエラー
///
/// どれもイベント単位で握りつぶされ、呼び出し元の接続にもルームの他のメンバーにも影響しません。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameEventError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Player '{player_id}' has no seated opponent in room '{room_id}'")]
    OpponentMissing { room_id: String, player_id: String },

    #[error("Game in room '{0}' has not started")]
    GameNotStarted(String),
}

/// Room 詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Invalid room id: {0}")]
    InvalidRoomId(String),
}
