//! 로그 감시기 설정
//!
//! [`WatchConfig`]는 core의 [`WatcherConfig`](dolphin_core::config::WatcherConfig)를
//! 기반으로 감시기 내부에서 쓰는 타입(경로, 시간 단위)으로 변환한 설정입니다.
//!
//! # 사용 예시
//! ```ignore
//! use dolphin_core::config::DolphinConfig;
//! use dolphin_log_watcher::WatchConfig;
//!
//! let core_config = DolphinConfig::default();
//! let config = WatchConfig::from_core(&core_config.watcher);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::error::LogWatcherError;

/// 로그 감시기 설정
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// 감시할 로그 파일 경로
    pub log_path: PathBuf,
    /// 새 데이터 확인 주기 (밀리초)
    pub poll_interval_ms: u64,
    /// 최대 라인 길이 (바이트), 초과하는 라인은 버림
    pub max_line_length: usize,
    /// 분류기 → 전송 단계 채널 용량
    pub channel_capacity: usize,
    /// 기본 사망 키워드 뒤에 붙일 사용자 정의 키워드
    pub death_keywords: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("logs/latest.log"),
            poll_interval_ms: 250,
            max_line_length: 64 * 1024, // 64KB
            channel_capacity: 1,
            death_keywords: Vec::new(),
        }
    }
}

impl WatchConfig {
    /// 지정한 로그 파일을 감시하는 기본 설정을 생성합니다.
    pub fn for_path(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            ..Self::default()
        }
    }

    /// core의 `WatcherConfig`에서 감시기 설정을 생성합니다.
    pub fn from_core(core: &dolphin_core::config::WatcherConfig) -> Self {
        Self {
            log_path: PathBuf::from(&core.log_path),
            poll_interval_ms: core.poll_interval_ms,
            max_line_length: core.max_line_length,
            channel_capacity: core.channel_capacity,
            death_keywords: core.death_keywords.clone(),
        }
    }

    /// 폴링 주기를 `Duration`으로 반환합니다.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogWatcherError> {
        const MAX_POLL_INTERVAL_MS: u64 = 60_000;

        if self.log_path.as_os_str().is_empty() {
            return Err(LogWatcherError::Config {
                field: "log_path".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.poll_interval_ms == 0 || self.poll_interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(LogWatcherError::Config {
                field: "poll_interval_ms".to_owned(),
                reason: format!("must be 1-{}", MAX_POLL_INTERVAL_MS),
            });
        }

        if self.max_line_length == 0 {
            return Err(LogWatcherError::Config {
                field: "max_line_length".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.channel_capacity == 0 {
            return Err(LogWatcherError::Config {
                field: "channel_capacity".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.death_keywords.iter().any(String::is_empty) {
            return Err(LogWatcherError::Config {
                field: "death_keywords".to_owned(),
                reason: "an empty keyword would match every line".to_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        WatchConfig::default().validate().unwrap();
    }

    #[test]
    fn from_core_copies_fields() {
        let core = dolphin_core::config::WatcherConfig {
            log_path: "/srv/mc/logs/latest.log".to_owned(),
            poll_interval_ms: 100,
            max_line_length: 1024,
            channel_capacity: 4,
            death_keywords: vec![" exploded".to_owned()],
        };
        let config = WatchConfig::from_core(&core);
        assert_eq!(config.log_path, PathBuf::from("/srv/mc/logs/latest.log"));
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.max_line_length, 1024);
        assert_eq!(config.channel_capacity, 4);
        assert_eq!(config.death_keywords, vec![" exploded"]);
    }

    #[test]
    fn rejects_zero_channel_capacity() {
        let config = WatchConfig {
            channel_capacity: 0,
            ..WatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_death_keyword() {
        let config = WatchConfig {
            death_keywords: vec![String::new()],
            ..WatchConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("death_keywords"));
    }

    #[test]
    fn rejects_empty_path() {
        let config = WatchConfig::for_path("");
        assert!(config.validate().is_err());
    }
}
