//! 파이프라인 trait -- 모듈 확장 포인트 정의

use std::fmt;
use std::future::Future;

use crate::error::{DeliveryError, DolphinError};
use crate::event::MinecraftMessage;

/// 모듈 건강 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// 정상 동작
    Healthy,
    /// 동작하지 않음
    Unhealthy(String),
}

impl HealthStatus {
    /// 정상 상태인지 확인합니다.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// 비정상 상태인지 확인합니다.
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy(reason) => write!(f, "unhealthy: {reason}"),
        }
    }
}

/// 생명주기를 가진 파이프라인 trait
///
/// ```text
/// Initialized → start() → Running → stop() → Stopped
/// ```
pub trait Pipeline: Send {
    /// 파이프라인을 시작합니다.
    ///
    /// 이미 실행 중이면 `PipelineError::AlreadyRunning`을 반환합니다.
    fn start(&mut self) -> impl Future<Output = Result<(), DolphinError>> + Send;

    /// 파이프라인을 정지합니다.
    ///
    /// 실행 중이 아니면 `PipelineError::NotRunning`을 반환합니다.
    fn stop(&mut self) -> impl Future<Output = Result<(), DolphinError>> + Send;

    /// 파이프라인의 건강 상태를 확인합니다.
    fn health_check(&self) -> impl Future<Output = HealthStatus> + Send;
}

/// 메시지 전송 대상 trait
///
/// 전송 단계는 이 trait을 구현합니다. 실패한 전송은 재시도하지 않습니다.
pub trait MessageSink: Send + Sync {
    /// 전송 대상 이름 (로깅용)
    fn name(&self) -> &str;

    /// 메시지 하나를 전송합니다.
    fn deliver(
        &self,
        message: &MinecraftMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}
