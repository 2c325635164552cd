//! Server state shared by the handlers.

use std::sync::Arc;

use crate::{
    domain::MessagePusher,
    usecase::{GetRoomDetailUseCase, GetRoomsUseCase},
};

use super::router::EventRouter;

/// Shared application state
pub struct AppState {
    /// MessagePusher（接続ごとの送信チャンネルの登録先）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// EventRouter（WebSocket イベントの振り分け）
    pub router: Arc<EventRouter>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
