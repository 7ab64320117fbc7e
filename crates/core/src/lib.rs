//! Dolphin 공통 크레이트
//!
//! 로그 감시기(`dolphin-log-watcher`)와 데몬(`dolphin-daemon`)이 함께 쓰는
//! 메시지 타입, 에러, 설정, 파이프라인 trait, 메트릭 이름을 정의합니다.

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod pipeline;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, DeliveryError, DolphinError, PipelineError};

// 설정
pub use config::DolphinConfig;

// 이벤트
pub use event::{MessageSource, MinecraftMessage};

// 파이프라인 trait
pub use pipeline::{HealthStatus, MessageSink, Pipeline};
