//! UseCase 間で共有する処理

use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;

use crate::domain::{
    ConnectionId, GameEnd, GameRecord, GameRecordStore, MessagePusher, Notification, Room, RoomId,
    RoomRepository, Timestamp,
};

use super::error::GameEventError;

/// 既存の Room をロックして返す。存在しない（または削除済みの）場合はエラー
pub(super) async fn lock_existing_room(
    repository: &dyn RoomRepository,
    room_id: &RoomId,
) -> Result<OwnedMutexGuard<Room>, GameEventError> {
    let shared = repository
        .find(room_id)
        .await
        .ok_or_else(|| GameEventError::RoomNotFound(room_id.as_str().to_string()))?;
    let room = shared.lock_owned().await;
    if room.is_evicted() {
        return Err(GameEventError::RoomNotFound(room_id.as_str().to_string()));
    }
    Ok(room)
}

/// 1 つの接続に送信する。失敗はログに残すだけ
pub(super) async fn push_logged(
    message_pusher: &dyn MessagePusher,
    connection_id: &ConnectionId,
    notification: &Notification,
) {
    if let Err(e) = message_pusher.push_to(connection_id, notification).await {
        tracing::warn!(
            "Failed to push '{}' to connection '{}': {}",
            notification.kind(),
            connection_id,
            e
        );
    }
}

/// 複数の接続に送信する。失敗はログに残すだけ
pub(super) async fn broadcast_logged(
    message_pusher: &dyn MessagePusher,
    targets: Vec<ConnectionId>,
    notification: &Notification,
) {
    if let Err(e) = message_pusher.broadcast(targets, notification).await {
        tracing::warn!("Failed to broadcast '{}': {}", notification.kind(), e);
    }
}

/// 再接続・途中参加した接続に送る現在の状態
pub(super) fn state_replay(room: &Room, as_spectator: bool) -> Notification {
    Notification::GameState {
        board: room.board().clone(),
        players: room.players().to_vec(),
        game_started: room.has_started(),
        as_spectator,
        messages: room.messages().cloned().collect(),
    }
}

/// 対局を終了させ、game-end を全員に送る
///
/// 対局が始まっていない Room では何もせず `GameNotStarted` を返す。
/// 今回の呼び出しで終了状態に遷移した場合に限り、対局記録を保存先へ渡す。
/// 保存は別タスクで行い（fire-and-forget）、失敗しても通知は取り消さない。
pub(super) async fn conclude_game(
    room: &mut Room,
    game_end: GameEnd,
    now: Timestamp,
    message_pusher: &dyn MessagePusher,
    record_store: &Arc<dyn GameRecordStore>,
) -> Result<(), GameEventError> {
    if !room.has_started() {
        return Err(GameEventError::GameNotStarted(room.id.as_str().to_string()));
    }
    let transitioned = room.finish(now);
    tracing::info!(
        "Game in room '{}' ended: {} ({})",
        room.id,
        game_end.result.as_str(),
        game_end.message
    );

    let notification = Notification::GameEnd(game_end.clone());
    broadcast_logged(message_pusher, room.connected_connections(), &notification).await;

    if transitioned {
        let record = GameRecord::from_room(room, &game_end, now);
        let record_store = Arc::clone(record_store);
        tokio::spawn(async move {
            let room_id = record.room_id.clone();
            if let Err(e) = record_store.save(record).await {
                tracing::warn!("Failed to save game record for room '{}': {}", room_id, e);
            }
        });
    }
    Ok(())
}
