//! Domain layer: entities, value objects and the interfaces the domain needs.

pub mod entity;
pub mod error;
pub mod game_record;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    Admission, Board, ChatMessage, Color, DEFAULT_MESSAGE_CAPACITY, Departure, GameEnd, GameResult,
    Player, Room, RoomStatus, SEAT_COUNT, Spectator,
};
pub use error::{GameRecordError, MessagePushError, RepositoryError, ValueObjectError};
pub use game_record::{GameRecord, GameRecordStore, RecordedPlayer};
pub use message_pusher::{MessagePusher, Notification, PusherChannel};
pub use repository::{RoomRepository, SharedRoom};
pub use value_object::{
    BoardState, ChessMove, ConnectionId, ConnectionIdFactory, INITIAL_BOARD_STATE, MessageContent,
    PlayerId, PlayerName, RoomId, Timestamp,
};

#[cfg(test)]
pub use game_record::MockGameRecordStore;
