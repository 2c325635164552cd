//! Connection Session
//!
//! 1 本の WebSocket 接続の状態です。接続 ID はサーバーが払い出し、
//! join-game を受け付けた時点でプレイヤーの識別子と Room に紐づきます。

use crate::domain::{Admission, ConnectionId, PlayerId, RoomId};

/// 接続に紐づいたプレイヤーの識別情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub spectator: bool,
}

#[derive(Debug)]
pub struct ConnectionSession {
    connection_id: ConnectionId,
    identity: Option<SessionIdentity>,
}

impl ConnectionSession {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            identity: None,
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    /// 入室結果に応じて識別情報を紐づける（別の Room への入室で付け替わる）
    pub fn bind(&mut self, room_id: RoomId, player_id: PlayerId, admission: &Admission) {
        if let Some(previous) = &self.identity
            && previous.room_id != room_id
        {
            tracing::debug!(
                "Connection '{}' moves from room '{}' to '{}'",
                self.connection_id,
                previous.room_id,
                room_id
            );
        }

        self.identity = Some(SessionIdentity {
            room_id,
            player_id,
            spectator: matches!(admission, Admission::Spectating { .. }),
        });
    }
}
