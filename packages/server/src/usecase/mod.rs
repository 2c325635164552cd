//! UseCase layer: 1 つのクライアントイベント（または定期処理）ごとのアプリケーションロジック

pub mod disconnect_player;
pub mod draw;
pub mod error;
pub mod join_game;
pub mod make_move;
pub mod query_rooms;
pub mod reap_idle_rooms;
pub mod report_game_over;
pub mod resign;
pub mod send_chat;
mod support;

#[cfg(test)]
pub(crate) mod test_support;

pub use disconnect_player::DisconnectPlayerUseCase;
pub use draw::{OfferDrawUseCase, RespondToDrawUseCase};
pub use error::{GameEventError, GetRoomDetailError};
pub use join_game::JoinGameUseCase;
pub use make_move::MakeMoveUseCase;
pub use query_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use reap_idle_rooms::ReapIdleRoomsUseCase;
pub use report_game_over::ReportGameOverUseCase;
pub use resign::ResignUseCase;
pub use send_chat::SendChatUseCase;
