//! 라인 분류기 -- 접두사가 제거된 로그 본문을 메시지로 변환
//!
//! [`LineClassifier`]는 규칙을 정해진 순서대로 평가하며, 첫 번째로 일치하는 규칙이
//! 결과를 결정합니다. 인증 라인과 퇴장 라인은 플레이어 UUID 캐시를 갱신하는
//! 부수 효과가 있으므로 분류기는 하나의 태스크에서만 사용해야 합니다.
//!
//! # 규칙 순서
//! 1. 주민 사망 (`Villager ... died, message:`) → 무시
//! 2. 인증 (`UUID of player <name> is <uuid>`) → 캐시 기록, 무시
//! 3. 채팅 (`<name> text`) → 플레이어 메시지
//! 4. 입장/퇴장 (`joined the game` / `left the game`) → 서버 메시지
//! 5. 발전 과제 → `:partying_face:` 서버 메시지
//! 6. 서버 시작 완료 (`Done (`) → 고정 문구
//! 7. 서버 종료 (`Stopping the server`) → 고정 문구
//! 8. 사망 키워드 → `:skull:` 서버 메시지
//! 9. 그 외 → 무시
//!
//! # 사용 예시
//! ```ignore
//! use dolphin_log_watcher::LineClassifier;
//!
//! let mut classifier = LineClassifier::new(Vec::new());
//! let msg = classifier.parse_line("[12:32:45] [Server thread/INFO]: <Bob> hi");
//! ```

use tracing::{debug, warn};

use dolphin_core::event::{
    CELEBRATION_MARKER, DEATH_MARKER, MinecraftMessage, SERVER_STARTED_CONTENT,
    SERVER_STOPPING_CONTENT,
};
use dolphin_core::metrics as m;

use crate::identity::IdentityCache;
use crate::prefix::strip_prefix;

/// 기본 사망 키워드 (순서 유지, 중복 포함)
pub const DEFAULT_DEATH_KEYWORDS: &[&str] = &[
    " shot",
    " pricked",
    " walked into a cactus",
    " roasted",
    " drowned",
    " kinetic",
    " blew up",
    " blown up",
    " killed",
    " hit the ground",
    " fell",
    " doomed",
    " squashed",
    " magic",
    " flames",
    " burned",
    " walked into fire",
    " burnt",
    " bang",
    " tried to swim in lava",
    " lightning",
    "floor was lava",
    "danger zone",
    " slain",
    " fireballed",
    " stung",
    " starved",
    " suffocated",
    " squished",
    " poked",
    " imapled",
    "didn't want to live",
    " withered",
    " pummeled",
    " died",
    " slain",
];

/// 사망 키워드(" killed")를 포함하지만 사망 메시지가 아닌 서버 안내 문구
pub const DRAGON_ALREADY_KILLED: &str =
    "Found that the dragon has been killed in this world already.";

const AUTH_PREFIX: &str = "UUID of player";
const VILLAGER_PREFIX: &str = "Villager";
const VILLAGER_DEATH: &str = "died, message:";
const JOINED: &str = "joined the game";
const LEFT: &str = "left the game";
const ADVANCEMENT_PHRASES: [&str; 3] = [
    "has made the advancement",
    "has completed the challenge",
    "has reached the goal",
];
const SERVER_DONE_PREFIX: &str = "Done (";
const SERVER_STOPPING_PREFIX: &str = "Stopping the server";

/// 분류된 메시지 종류 (메트릭 레이블로 사용)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    /// 플레이어 채팅
    Chat,
    /// 입장/퇴장
    JoinLeave,
    /// 발전 과제/도전 과제/목표
    Advancement,
    /// 서버 시작 완료
    ServerStarted,
    /// 서버 종료 중
    ServerStopping,
    /// 플레이어 사망
    Death,
}

impl MessageCategory {
    /// 레이블 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::JoinLeave => "join_leave",
            Self::Advancement => "advancement",
            Self::ServerStarted => "server_started",
            Self::ServerStopping => "server_stopping",
            Self::Death => "death",
        }
    }
}

/// 분류 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// 전송할 메시지 없음
    NoMatch,
    /// 플레이어 메시지
    Player(MinecraftMessage),
    /// 서버 메시지
    Server(MinecraftMessage),
}

impl Classification {
    /// 메시지를 꺼냅니다. `NoMatch`면 `None`입니다.
    pub fn into_message(self) -> Option<MinecraftMessage> {
        match self {
            Self::NoMatch => None,
            Self::Player(msg) | Self::Server(msg) => Some(msg),
        }
    }

    /// 메시지가 없는 결과인지 확인합니다.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }
}

/// 로그 라인 분류기
///
/// 사망 키워드 목록과 플레이어 UUID 캐시를 소유합니다.
pub struct LineClassifier {
    death_keywords: Vec<String>,
    identities: IdentityCache,
}

impl LineClassifier {
    /// 기본 사망 키워드 뒤에 사용자 정의 키워드를 붙여 분류기를 생성합니다.
    ///
    /// 중복 제거는 하지 않습니다.
    pub fn new(custom_keywords: Vec<String>) -> Self {
        let mut death_keywords: Vec<String> = DEFAULT_DEATH_KEYWORDS
            .iter()
            .map(|k| (*k).to_owned())
            .collect();
        death_keywords.extend(custom_keywords);
        Self::with_keywords(death_keywords)
    }

    /// 주어진 키워드 목록만 사용하는 분류기를 생성합니다.
    pub fn with_keywords(death_keywords: Vec<String>) -> Self {
        Self {
            death_keywords,
            identities: IdentityCache::new(),
        }
    }

    /// 현재 사망 키워드 목록
    pub fn death_keywords(&self) -> &[String] {
        &self.death_keywords
    }

    /// 플레이어 UUID 캐시
    pub fn identities(&self) -> &IdentityCache {
        &self.identities
    }

    /// 원시 로그 라인의 접두사를 제거한 뒤 분류합니다.
    pub fn parse_line(&mut self, raw: &str) -> Option<MinecraftMessage> {
        let stripped = strip_prefix(raw);
        self.classify(stripped).into_message()
    }

    /// 접두사가 제거된 라인을 분류합니다.
    pub fn classify(&mut self, line: &str) -> Classification {
        let (classification, category) = self.evaluate(line);

        if let Some(category) = category {
            metrics::counter!(m::WATCHER_MESSAGES_TOTAL, m::LABEL_CATEGORY => category.as_str())
                .increment(1);
        }
        if let Classification::Player(msg) | Classification::Server(msg) = &classification {
            debug!(category = ?category, message = %msg, "classified log line");
        }

        classification
    }

    fn evaluate(&mut self, line: &str) -> (Classification, Option<MessageCategory>) {
        if line.is_empty() {
            return (Classification::NoMatch, None);
        }

        if line.starts_with(VILLAGER_PREFIX) && line.contains(VILLAGER_DEATH) {
            return (Classification::NoMatch, None);
        }

        if line.starts_with(AUTH_PREFIX) {
            self.record_identity(line);
            return (Classification::NoMatch, None);
        }

        if line.starts_with('<') {
            return match self.chat_message(line) {
                Some(msg) => (Classification::Player(msg), Some(MessageCategory::Chat)),
                None => (Classification::NoMatch, None),
            };
        }

        if line.contains(JOINED) || line.contains(LEFT) {
            if line.contains(LEFT) {
                if let Some(name) = line.split_whitespace().next() {
                    self.identities.remove(name);
                    metrics::gauge!(m::WATCHER_IDENTITY_CACHE_SIZE)
                        .set(self.identities.len() as f64);
                }
            }
            return (
                Classification::Server(MinecraftMessage::server(line)),
                Some(MessageCategory::JoinLeave),
            );
        }

        if ADVANCEMENT_PHRASES.iter().any(|p| line.contains(p)) {
            return (
                Classification::Server(MinecraftMessage::server_with_marker(
                    CELEBRATION_MARKER,
                    line,
                )),
                Some(MessageCategory::Advancement),
            );
        }

        if line.starts_with(SERVER_DONE_PREFIX) {
            return (
                Classification::Server(MinecraftMessage::server(SERVER_STARTED_CONTENT)),
                Some(MessageCategory::ServerStarted),
            );
        }

        if line.starts_with(SERVER_STOPPING_PREFIX) {
            return (
                Classification::Server(MinecraftMessage::server(SERVER_STOPPING_CONTENT)),
                Some(MessageCategory::ServerStopping),
            );
        }

        if line != DRAGON_ALREADY_KILLED
            && self.death_keywords.iter().any(|k| line.contains(k.as_str()))
        {
            return (
                Classification::Server(MinecraftMessage::server_with_marker(DEATH_MARKER, line)),
                Some(MessageCategory::Death),
            );
        }

        (Classification::NoMatch, None)
    }

    /// `UUID of player <name> is <uuid>` 라인에서 이름과 UUID를 캐시에 기록합니다.
    fn record_identity(&mut self, line: &str) {
        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() < 6 {
            warn!(line, "malformed player authentication line");
            return;
        }

        self.identities.insert(tokens[3], tokens[5]);
        metrics::gauge!(m::WATCHER_IDENTITY_CACHE_SIZE).set(self.identities.len() as f64);
    }

    /// `<name> text` 라인에서 채팅 메시지를 만듭니다.
    fn chat_message(&self, line: &str) -> Option<MinecraftMessage> {
        let (name_part, content) = line.split_once(' ')?;
        let name = name_part.strip_prefix('<').unwrap_or(name_part);
        let name = name.strip_suffix('>').unwrap_or(name);
        let uuid = self.identities.get(name).unwrap_or_default();

        Some(MinecraftMessage::player(name, content, uuid))
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
