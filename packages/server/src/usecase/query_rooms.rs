//! UseCase: Room 一覧・詳細の取得（HTTP の確認用 API 向け）

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

use super::error::GetRoomDetailError;

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全 Room のスナップショットを ID 順で返す
    pub async fn execute(&self) -> Vec<Room> {
        let mut rooms = Vec::new();
        for shared in self.repository.all_rooms().await {
            let room = shared.lock().await;
            if !room.is_evicted() {
                rooms.push(room.clone());
            }
        }
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id =
            RoomId::new(room_id).map_err(|e| GetRoomDetailError::InvalidRoomId(e.to_string()))?;
        let shared = self
            .repository
            .find(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)?;
        let room = shared.lock().await;
        if room.is_evicted() {
            return Err(GetRoomDetailError::RoomNotFound);
        }
        Ok(room.clone())
    }
}
