//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! Room ごとに `Arc<Mutex<Room>>` を持たせているため、Room マップ自体のロックは
//! 検索・追加・削除の間だけ保持し、Room の中身の変更とは切り離されます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    DEFAULT_MESSAGE_CAPACITY, RepositoryError, Room, RoomId, RoomRepository, SharedRoom, Timestamp,
};

/// インメモリ Room Repository 実装
///
/// プロセス全体で 1 つだけ作成し、UseCase に注入して使います。
pub struct InMemoryRoomRepository {
    /// Room ID → Room
    rooms: Mutex<HashMap<RoomId, SharedRoom>>,
    /// 新しく作成する Room のチャット履歴の保持件数
    message_capacity: usize,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::with_message_capacity(DEFAULT_MESSAGE_CAPACITY)
    }

    /// チャット履歴の保持件数を指定して作成
    pub fn with_message_capacity(message_capacity: usize) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            message_capacity,
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_or_create(&self, room_id: &RoomId, now: Timestamp) -> SharedRoom {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::info!("Room '{}' created", room_id);
                Arc::new(Mutex::new(Room::with_capacity(
                    room_id.clone(),
                    now,
                    self.message_capacity,
                )))
            })
            .clone()
    }

    async fn find(&self, room_id: &RoomId) -> Option<SharedRoom> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn all_rooms(&self) -> Vec<SharedRoom> {
        let rooms = self.rooms.lock().await;
        rooms.values().cloned().collect()
    }

    async fn remove(&self, room_id: &RoomId) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .remove(room_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn count(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }
}
