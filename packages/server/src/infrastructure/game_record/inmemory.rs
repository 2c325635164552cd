//! InMemory GameRecordStore 実装

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{GameRecord, GameRecordError, GameRecordStore};

/// 終局した対局の記録をメモリ上に保持する
#[derive(Default)]
pub struct InMemoryGameRecordStore {
    records: Mutex<Vec<GameRecord>>,
}

impl InMemoryGameRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みの記録（保存順）
    pub async fn records(&self) -> Vec<GameRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl GameRecordStore for InMemoryGameRecordStore {
    async fn save(&self, record: GameRecord) -> Result<(), GameRecordError> {
        tracing::info!(
            "Saved game record for room '{}' ({}, {} moves)",
            record.room_id,
            record.result.as_str(),
            record.moves.len()
        );
        self.records.lock().await.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoardState, GameResult, RoomId, Timestamp};

    #[tokio::test]
    async fn test_save_keeps_records_in_order() {
        // テスト項目: 保存した記録が保存順に取得できる
        // given (前提条件):
        let store = InMemoryGameRecordStore::new();
        let record = |room: &str| GameRecord {
            room_id: RoomId::new(room.to_string()).unwrap(),
            players: vec![],
            result: GameResult::Draw,
            winner_id: None,
            message: "Game drawn by agreement.".to_string(),
            moves: vec![],
            final_position: BoardState::initial(),
            finished_at: Timestamp::new(0),
        };

        // when (操作):
        store.save(record("R1")).await.unwrap();
        store.save(record("R2")).await.unwrap();

        // then (期待する結果):
        let rooms: Vec<String> = store
            .records()
            .await
            .into_iter()
            .map(|r| r.room_id.into_string())
            .collect();
        assert_eq!(rooms, vec!["R1".to_string(), "R2".to_string()]);
    }
}
