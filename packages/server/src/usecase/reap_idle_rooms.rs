//! UseCase: 放置された Room の削除
//!
//! 接続中のメンバーがおらず、最後の操作から一定時間が経った Room を Registry から取り除きます。
//! 接続中のメンバーがいる Room は削除しません。

use std::{sync::Arc, time::Duration};

use gambit_shared::time::Clock;

use crate::domain::{RoomId, RoomRepository, Timestamp};

/// 放置 Room 削除のユースケース
pub struct ReapIdleRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
    idle_timeout: Duration,
}

impl ReapIdleRoomsUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            idle_timeout,
        }
    }

    /// 削除を実行し、削除した Room の ID を返す
    pub async fn execute(&self) -> Vec<RoomId> {
        let now = Timestamp::new(self.clock.now_millis());
        let timeout_millis = i64::try_from(self.idle_timeout.as_millis()).unwrap_or(i64::MAX);
        let mut reaped = Vec::new();

        for shared in self.repository.all_rooms().await {
            // 削除は Room のロックを保持したまま行い、入室処理と競合しないようにする
            let mut room = shared.lock().await;
            if room.is_evicted() || !room.is_idle(now, timeout_millis) {
                continue;
            }

            room.mark_evicted();
            match self.repository.remove(&room.id).await {
                Ok(()) => {
                    tracing::info!(
                        "Reaped idle room '{}' ({})",
                        room.id,
                        room.status().as_str()
                    );
                    reaped.push(room.id.clone());
                }
                Err(e) => tracing::warn!("Failed to reap room '{}': {}", room.id, e),
            }
        }

        reaped
    }
}
