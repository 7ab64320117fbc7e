//! 메시지 타입 -- 분류기가 만들고 전송 단계가 소비하는 정규화된 이벤트
//!
//! [`MinecraftMessage`]는 로그 한 줄에서 정확히 하나만 만들어지며,
//! 생성 이후에는 변경되지 않고 전송 단계에서 한 번 소비됩니다.
//!
//! # 전송 형식
//! ```json
//! {"name": "TestUser", "content": "hello", "source": "Player", "uuid": "7f7c..."}
//! ```
//! `uuid` 키는 항상 포함되며, 알 수 없으면 빈 문자열입니다.

use std::fmt;

use serde::{Deserialize, Serialize};

// --- 메시지 마커 ---

/// 발전 과제/도전 과제/목표 달성 마커
pub const CELEBRATION_MARKER: &str = ":partying_face:";
/// 사망 메시지 마커
pub const DEATH_MARKER: &str = ":skull:";
/// 서버 시작 완료 메시지 (고정 문구)
pub const SERVER_STARTED_CONTENT: &str = ":white_check_mark: Server has started";
/// 서버 종료 중 메시지 (고정 문구)
pub const SERVER_STOPPING_CONTENT: &str = ":x: Server is shutting down";

/// 메시지 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageSource {
    /// 플레이어가 보낸 메시지 (채팅)
    Player,
    /// 서버가 만든 메시지 (접속, 사망, 서버 상태 등)
    Server,
}

impl fmt::Display for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Server => write!(f, "Server"),
        }
    }
}

/// Minecraft 서버에서 발생한 정규화된 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinecraftMessage {
    /// 플레이어 표시 이름 (서버 메시지는 빈 문자열)
    #[serde(rename = "name")]
    pub username: String,
    /// 사람이 읽을 수 있는 본문 (마커가 붙을 수 있음)
    pub content: String,
    /// 메시지 출처
    pub source: MessageSource,
    /// 플레이어 UUID (채팅 메시지에서 캐시된 경우에만 채워짐)
    pub uuid: String,
}

impl MinecraftMessage {
    /// 플레이어 채팅 메시지를 생성합니다.
    pub fn player(
        username: impl Into<String>,
        content: impl Into<String>,
        uuid: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            content: content.into(),
            source: MessageSource::Player,
            uuid: uuid.into(),
        }
    }

    /// 서버 메시지를 생성합니다.
    pub fn server(content: impl Into<String>) -> Self {
        Self {
            username: String::new(),
            content: content.into(),
            source: MessageSource::Server,
            uuid: String::new(),
        }
    }

    /// 마커를 앞에 붙인 서버 메시지를 생성합니다.
    pub fn server_with_marker(marker: &str, line: &str) -> Self {
        Self::server(format!("{marker} {line}"))
    }

    /// 플레이어 메시지인지 확인합니다.
    pub fn is_player(&self) -> bool {
        self.source == MessageSource::Player
    }
}

impl fmt::Display for MinecraftMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.username.is_empty() {
            write!(f, "{}: {}", self.source, self.content)
        } else {
            write!(f, "{}/{}: {}", self.source, self.username, self.content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_message_serializes_with_wire_field_names() {
        let msg = MinecraftMessage::player("TestUser", "hello there", "abc-123");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["name"], "TestUser");
        assert_eq!(value["content"], "hello there");
        assert_eq!(value["source"], "Player");
        assert_eq!(value["uuid"], "abc-123");
        assert!(value.get("username").is_none());
    }

    #[test]
    fn server_message_keeps_empty_uuid_key() {
        let msg = MinecraftMessage::server(SERVER_STARTED_CONTENT);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""source":"Server""#));
        assert!(json.contains(r#""uuid":"""#));
        assert!(json.contains(r#""name":"""#));
    }

    #[test]
    fn marker_is_joined_with_single_space() {
        let msg = MinecraftMessage::server_with_marker(DEATH_MARKER, "Bob fell from a high place");
        assert_eq!(msg.content, ":skull: Bob fell from a high place");
        assert!(!msg.is_player());
    }

    #[test]
    fn display_includes_username_only_for_player() {
        let chat = MinecraftMessage::player("Alex", "hi", "");
        assert_eq!(chat.to_string(), "Player/Alex: hi");

        let server = MinecraftMessage::server("Alex joined the game");
        assert_eq!(server.to_string(), "Server: Alex joined the game");
    }
}
