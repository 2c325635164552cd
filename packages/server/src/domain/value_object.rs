//! Value Objects
//!
//! 不変で、値そのものによって同一性が決まるドメインの型を定義します。
//! 生成時にバリデーションを行い、不正な値を持つインスタンスは作れません。

use super::error::ValueObjectError;

/// 標準的な初期局面（FEN）
pub const INITIAL_BOARD_STATE: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// 空白のみの値を拒否する。値そのものは受け取ったまま返す（識別子は不透明な文字列）
fn require_non_blank(value: String, field: &'static str) -> Result<String, ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    Ok(value)
}

/// 呼び出し側が指定する Room の識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(value, "room_id").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 呼び出し側が指定するプレイヤーの安定した識別子（接続 ID とは別物）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(value, "player_id").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 表示名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(value, "player_name").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// WebSocket 接続ごとにサーバーが払い出す識別子
///
/// 再接続のたびに新しい値になるため、プレイヤーの識別には使いません。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("connection_id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Connection ID を生成するファクトリ
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// UUID v4 で新しい Connection ID を生成
    pub fn generate() -> ConnectionId {
        ConnectionId(uuid::Uuid::new_v4().to_string())
    }
}

/// チャットメッセージ本文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(value, "message_content").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// シリアライズ済みの盤面（FEN 等）
///
/// サーバーは合法性を検証せず、クライアントから渡された値をそのまま保持します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState(String);

impl BoardState {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_non_blank(value, "board_state").map(Self)
    }

    /// 標準の初期局面
    pub fn initial() -> Self {
        Self(INITIAL_BOARD_STATE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// クライアントから中継される指し手
///
/// 表現（SAN 文字列、`{from, to, promotion}` オブジェクトなど）はクライアント側の
/// ルールエンジンに任せ、サーバーは JSON 値のまま保持・中継します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessMove(serde_json::Value);

impl ChessMove {
    pub fn new(value: serde_json::Value) -> Result<Self, ValueObjectError> {
        match &value {
            serde_json::Value::Null => Err(ValueObjectError::Empty("move")),
            serde_json::Value::String(s) if s.trim().is_empty() => {
                Err(ValueObjectError::Empty("move"))
            }
            _ => Ok(Self(value)),
        }
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// `earlier` からの経過ミリ秒（負にはならない）
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_keeps_value_as_received() {
        // テスト項目: 前後に空白のある Room ID は別の Room ID として扱われる
        // given (前提条件):
        let raw = "R1 ".to_string();

        // when (操作):
        let padded = RoomId::new(raw).unwrap();
        let plain = RoomId::new("R1".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(padded.as_str(), "R1 ");
        assert_ne!(padded, plain);
    }

    #[test]
    fn test_room_id_rejects_empty() {
        // テスト項目: 空白のみの Room ID はエラーになる
        // given (前提条件):
        let raw = "   ".to_string();

        // when (操作):
        let result = RoomId::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("room_id")));
    }

    #[test]
    fn test_long_values_are_accepted() {
        // テスト項目: 長い表示名や本文にも上限はない
        // given (前提条件):
        let name = "A".repeat(200);
        let text = "x".repeat(5_000);

        // when (操作):
        let player_name = PlayerName::new(name.clone()).unwrap();
        let content = MessageContent::new(text.clone()).unwrap();

        // then (期待する結果):
        assert_eq!(player_name.as_str(), name);
        assert_eq!(content.as_str(), text);
    }

    #[test]
    fn test_player_id_keeps_leading_whitespace() {
        // テスト項目: Player ID は加工されず、" a" と "a" は別のプレイヤーになる
        // given (前提条件):
        let raw = " a".to_string();

        // when (操作):
        let player_id = PlayerId::new(raw).unwrap();

        // then (期待する結果):
        assert_ne!(player_id, PlayerId::new("a".to_string()).unwrap());
    }

    #[test]
    fn test_message_content_keeps_inner_whitespace() {
        // テスト項目: メッセージ本文は加工されずに保持される
        // given (前提条件):
        let raw = " good  game ".to_string();

        // when (操作):
        let content = MessageContent::new(raw.clone()).unwrap();

        // then (期待する結果):
        assert_eq!(content.as_str(), raw);
    }

    #[test]
    fn test_connection_id_factory_generates_unique_ids() {
        // テスト項目: ConnectionIdFactory は毎回異なる ID を生成する
        // given (前提条件):

        // when (操作):
        let first = ConnectionIdFactory::generate();
        let second = ConnectionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(first, second);
    }

    #[test]
    fn test_timestamp_millis_since_never_negative() {
        // テスト項目: 経過時間は時計が巻き戻っても負にならない
        // given (前提条件):
        let earlier = Timestamp::new(2_000);
        let later = Timestamp::new(1_500);

        // when (操作):
        let elapsed = later.millis_since(earlier);

        // then (期待する結果):
        assert_eq!(elapsed, 0);
    }
}
