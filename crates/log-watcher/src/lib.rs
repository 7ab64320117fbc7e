//! Minecraft 서버 로그 감시 및 분류 파이프라인
//!
//! # 모듈 구성
//!
//! - [`tail`]: 계속 추가되는 로그 파일을 따라가며 새 라인을 읽음 (로테이션 대응)
//! - [`prefix`]: `[시각] [스레드/레벨]: ` 접두사 제거
//! - [`identity`]: 플레이어 이름 → UUID 캐시
//! - [`classifier`]: 순서가 정해진 규칙으로 라인을 메시지로 분류
//! - [`pipeline`]: 감시/분류 태스크와 전송 단계 사이의 채널 연결
//! - [`config`]: 감시기 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! LogTail -> strip_prefix -> LineClassifier (IdentityCache) -> mpsc -> delivery
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod prefix;
pub mod tail;

// --- 주요 타입 re-export ---

pub use classifier::{Classification, LineClassifier, MessageCategory, DEFAULT_DEATH_KEYWORDS};
pub use config::WatchConfig;
pub use error::LogWatcherError;
pub use identity::IdentityCache;
pub use pipeline::{WatchPipeline, WatchPipelineBuilder};
pub use prefix::strip_prefix;
pub use tail::LogTail;
