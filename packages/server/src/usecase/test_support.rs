//! UseCase のテストで共有するフェイク

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gambit_shared::time::{Clock, FixedClock};

use crate::{
    domain::{
        ConnectionId, GameRecordStore, MessagePushError, MessagePusher, Notification, PlayerId,
        PlayerName, PusherChannel, RoomId, RoomRepository,
    },
    infrastructure::{game_record::InMemoryGameRecordStore, repository::InMemoryRoomRepository},
};

/// 送信された通知を接続ごとに記録する MessagePusher
#[derive(Default)]
pub struct RecordingMessagePusher {
    pushed: Mutex<Vec<(ConnectionId, Notification)>>,
}

impl RecordingMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `connection_id` が受け取った通知（受信順）
    pub fn received(&self, connection_id: &ConnectionId) -> Vec<Notification> {
        self.pushed
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == connection_id)
            .map(|(_, n)| n.clone())
            .collect()
    }

    /// `connection_id` が受け取った通知の種別名（受信順）
    pub fn kinds(&self, connection_id: &ConnectionId) -> Vec<&'static str> {
        self.received(connection_id)
            .iter()
            .map(Notification::kind)
            .collect()
    }

    pub fn clear(&self) {
        self.pushed.lock().unwrap().clear();
    }
}

#[async_trait]
impl MessagePusher for RecordingMessagePusher {
    async fn register_client(&self, _connection_id: ConnectionId, _sender: PusherChannel) {}

    async fn unregister_client(&self, _connection_id: &ConnectionId) {}

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        self.pushed
            .lock()
            .unwrap()
            .push((connection_id.clone(), notification.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let mut pushed = self.pushed.lock().unwrap();
        for target in targets {
            pushed.push((target, notification.clone()));
        }
        Ok(())
    }
}

/// UseCase を組み立てるための依存一式
pub struct Fixture {
    pub repository: Arc<InMemoryRoomRepository>,
    pub pusher: Arc<RecordingMessagePusher>,
    pub records: Arc<InMemoryGameRecordStore>,
    pub clock: Arc<dyn Clock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryRoomRepository::new()),
            pusher: Arc::new(RecordingMessagePusher::new()),
            records: Arc::new(InMemoryGameRecordStore::new()),
            clock: Arc::new(FixedClock::new(1_700_000_000_000)),
        }
    }

    pub fn repository(&self) -> Arc<dyn RoomRepository> {
        self.repository.clone()
    }

    pub fn pusher(&self) -> Arc<dyn MessagePusher> {
        self.pusher.clone()
    }

    pub fn records(&self) -> Arc<dyn GameRecordStore> {
        self.records.clone()
    }

    /// 保存タスクが完了するまで待つ
    pub async fn wait_for_records(&self, expected: usize) {
        for _ in 0..100 {
            if self.records.records().await.len() >= expected {
                return;
            }
            tokio::task::yield_now().await;
        }
    }
}

pub fn room_id(value: &str) -> RoomId {
    RoomId::new(value.to_string()).unwrap()
}

pub fn pid(value: &str) -> PlayerId {
    PlayerId::new(value.to_string()).unwrap()
}

pub fn name(value: &str) -> PlayerName {
    PlayerName::new(value.to_string()).unwrap()
}

pub fn conn(value: &str) -> ConnectionId {
    ConnectionId::new(value.to_string()).unwrap()
}
