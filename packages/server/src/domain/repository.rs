//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RepositoryError, Room, RoomId, Timestamp};

/// Room ごとに排他制御されたハンドル
///
/// 1 つの Room に対する変更と、その結果の通知の送信は、このロックを保持したまま行います。
/// これにより同じ Room 内の通知は処理順に届きます。Room 同士は独立しています。
pub type SharedRoom = Arc<Mutex<Room>>;

/// Room Repository trait（Room Registry）
///
/// ## 依存性の逆転（DIP）
///
/// - ドメイン層が必要とするインターフェースをドメイン層自身が定義
/// - Infrastructure 層がドメイン層のインターフェースに依存
/// - ドメイン層は Infrastructure 層に依存しない
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を取得し、存在しなければ `Waiting` 状態で作成する（失敗しない）
    async fn get_or_create(&self, room_id: &RoomId, now: Timestamp) -> SharedRoom;

    /// Room を取得（作成はしない）
    async fn find(&self, room_id: &RoomId) -> Option<SharedRoom>;

    /// 全ての Room のハンドルを取得
    async fn all_rooms(&self) -> Vec<SharedRoom>;

    /// Room を削除
    async fn remove(&self, room_id: &RoomId) -> Result<(), RepositoryError>;

    /// 保持している Room の数
    async fn count(&self) -> usize;
}
