//! 로그 감시기 에러 타입
//!
//! [`LogWatcherError`]는 감시/분류 파이프라인 내부에서 발생하는 에러를 표현합니다.
//! `From<LogWatcherError> for DolphinError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use dolphin_core::error::{ConfigError, DolphinError, PipelineError};

/// 로그 감시기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogWatcherError {
    /// 감시할 로그 파일이 없음 (시작 시 치명적)
    #[error("log file not found: {path}")]
    LogFileNotFound {
        /// 로그 파일 경로
        path: String,
    },

    /// 감시 시작 후 파일을 더 이상 따라갈 수 없음
    #[error("failed to follow {path}: {reason}")]
    Follow {
        /// 로그 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 채널 통신 에러
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LogWatcherError> for DolphinError {
    fn from(err: LogWatcherError) -> Self {
        match err {
            LogWatcherError::LogFileNotFound { .. } => {
                DolphinError::Pipeline(PipelineError::InitFailed(err.to_string()))
            }
            LogWatcherError::Follow { .. } => {
                DolphinError::Pipeline(PipelineError::SourceFailed(err.to_string()))
            }
            LogWatcherError::Config { field, reason } => {
                DolphinError::Config(ConfigError::InvalidValue { field, reason })
            }
            LogWatcherError::Channel(reason) => {
                DolphinError::Pipeline(PipelineError::ChannelSend(reason))
            }
            LogWatcherError::Io(e) => DolphinError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_not_found_display() {
        let err = LogWatcherError::LogFileNotFound {
            path: "/srv/mc/logs/latest.log".to_owned(),
        };
        assert!(err.to_string().contains("latest.log"));
    }

    #[test]
    fn not_found_converts_to_init_failed() {
        let err: DolphinError = LogWatcherError::LogFileNotFound {
            path: "/missing.log".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            DolphinError::Pipeline(PipelineError::InitFailed(_))
        ));
    }

    #[test]
    fn follow_converts_to_source_failed() {
        let err: DolphinError = LogWatcherError::Follow {
            path: "/srv/mc/logs/latest.log".to_owned(),
            reason: "permission denied".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            DolphinError::Pipeline(PipelineError::SourceFailed(_))
        ));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn config_error_keeps_field() {
        let err: DolphinError = LogWatcherError::Config {
            field: "poll_interval_ms".to_owned(),
            reason: "must be 1-60000".to_owned(),
        }
        .into();
        assert!(err.to_string().contains("poll_interval_ms"));
    }
}
