//! 설정 관리 -- dolphin.toml 파싱 및 런타임 설정
//!
//! [`DolphinConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선, `dolphin-daemon`에서 적용)
//! 2. 환경변수 (`DOLPHIN_DELIVERY_HOST=10.0.0.5` 형식)
//! 3. 설정 파일 (`dolphin.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 전송 대상 호스트/포트와 로그 파일 경로는 기본값이 없습니다.
//! 세 계층 중 어디에서든 채워져야 [`DolphinConfig::validate`]를 통과합니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), dolphin_core::error::DolphinError> {
//! use dolphin_core::config::DolphinConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let mut config = DolphinConfig::load("dolphin.toml").await?;
//! config.delivery.port = 5000;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, DolphinError};

/// 유효한 로그 레벨
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
/// 유효한 로그 형식
pub const VALID_LOG_FORMATS: &[&str] = &["compact", "json", "pretty"];
/// 폴링 주기 상한 (밀리초)
const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// Dolphin 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DolphinConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 로그 감시 설정
    #[serde(default)]
    pub watcher: WatcherConfig,
    /// 메시지 전송 설정
    #[serde(default)]
    pub delivery: DeliveryConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl DolphinConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 필수 값은 CLI에서 채워질 수 있으므로 여기서는 검증하지 않습니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DolphinError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DolphinError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DolphinError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                DolphinError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, DolphinError> {
        toml::from_str(toml_str).map_err(|e| {
            DolphinError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `DOLPHIN_{SECTION}_{FIELD}`
    /// 예: `DOLPHIN_WATCHER_LOG_PATH=/srv/mc/logs/latest.log`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "DOLPHIN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "DOLPHIN_GENERAL_LOG_FORMAT");

        // Watcher
        override_string(&mut self.watcher.log_path, "DOLPHIN_WATCHER_LOG_PATH");
        override_u64(
            &mut self.watcher.poll_interval_ms,
            "DOLPHIN_WATCHER_POLL_INTERVAL_MS",
        );
        override_usize(
            &mut self.watcher.max_line_length,
            "DOLPHIN_WATCHER_MAX_LINE_LENGTH",
        );
        override_usize(
            &mut self.watcher.channel_capacity,
            "DOLPHIN_WATCHER_CHANNEL_CAPACITY",
        );
        override_csv(
            &mut self.watcher.death_keywords,
            "DOLPHIN_WATCHER_DEATH_KEYWORDS",
        );

        // Delivery
        override_string(&mut self.delivery.host, "DOLPHIN_DELIVERY_HOST");
        override_u16(&mut self.delivery.port, "DOLPHIN_DELIVERY_PORT");
        override_u64(
            &mut self.delivery.timeout_secs,
            "DOLPHIN_DELIVERY_TIMEOUT_SECS",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "DOLPHIN_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "DOLPHIN_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "DOLPHIN_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DolphinError> {
        if !VALID_LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", VALID_LOG_LEVELS.join(", ")),
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", VALID_LOG_FORMATS.join(", ")),
            ));
        }

        if self.watcher.log_path.trim().is_empty() {
            return Err(invalid(
                "watcher.log_path",
                "path to the server log is required".to_owned(),
            ));
        }

        if self.watcher.poll_interval_ms == 0 || self.watcher.poll_interval_ms > MAX_POLL_INTERVAL_MS
        {
            return Err(invalid(
                "watcher.poll_interval_ms",
                format!("must be 1-{MAX_POLL_INTERVAL_MS}"),
            ));
        }

        if self.watcher.max_line_length == 0 {
            return Err(invalid(
                "watcher.max_line_length",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.watcher.channel_capacity == 0 {
            return Err(invalid(
                "watcher.channel_capacity",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.watcher.death_keywords.iter().any(String::is_empty) {
            return Err(invalid(
                "watcher.death_keywords",
                "keywords must not be empty".to_owned(),
            ));
        }

        if self.delivery.host.trim().is_empty() {
            return Err(invalid(
                "delivery.host",
                "destination host is required".to_owned(),
            ));
        }

        if self.delivery.port == 0 {
            return Err(invalid(
                "delivery.port",
                "destination port is required".to_owned(),
            ));
        }

        if self.metrics.enabled && self.metrics.endpoint != "/metrics" {
            return Err(invalid(
                "metrics.endpoint",
                "only '/metrics' is supported".to_owned(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> DolphinError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (compact, json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "compact".to_owned(),
        }
    }
}

/// 로그 감시 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// 감시할 Minecraft 서버 로그 경로
    pub log_path: String,
    /// 새 데이터 확인 주기 (밀리초)
    pub poll_interval_ms: u64,
    /// 최대 라인 길이 (바이트)
    pub max_line_length: usize,
    /// 분류기 → 전송 단계 채널 용량
    pub channel_capacity: usize,
    /// 기본 목록 뒤에 추가할 사망 키워드
    pub death_keywords: Vec<String>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            log_path: String::new(),
            poll_interval_ms: 250,
            max_line_length: 64 * 1024, // 64KB
            channel_capacity: 1,
            death_keywords: Vec::new(),
        }
    }
}

/// 메시지 전송 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// 수신 서버 호스트명
    pub host: String,
    /// 수신 서버 포트
    pub port: u16,
    /// 요청 타임아웃 (초, 0이면 타임아웃 없음)
    pub timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 0,
            timeout_secs: 10,
        }
    }
}

impl DeliveryConfig {
    /// 메시지를 POST할 주소를 반환합니다.
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 바인드 주소
    pub listen_addr: String,
    /// 포트
    pub port: u16,
    /// 엔드포인트 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9100,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

// 사망 키워드는 앞 공백이 의미를 가지므로 trim하지 않음
fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> DolphinConfig {
        let mut config = DolphinConfig::default();
        config.watcher.log_path = "/srv/minecraft/logs/latest.log".to_owned();
        config.delivery.host = "127.0.0.1".to_owned();
        config.delivery.port = 5000;
        config
    }

    #[test]
    fn default_config_has_sane_values() {
        let config = DolphinConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "compact");
        assert_eq!(config.watcher.poll_interval_ms, 250);
        assert_eq!(config.watcher.channel_capacity, 1);
        assert!(config.watcher.death_keywords.is_empty());
        assert_eq!(config.delivery.timeout_secs, 10);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn default_config_requires_log_path() {
        let err = DolphinConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("watcher.log_path"));
    }

    #[test]
    fn filled_config_passes_validation() {
        valid_config().validate().unwrap();
    }

    #[test]
    fn validate_rejects_missing_host() {
        let mut config = valid_config();
        config.delivery.host = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("delivery.host"));
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut config = valid_config();
        config.delivery.port = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("delivery.port"));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = valid_config();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = valid_config();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_zero_channel_capacity() {
        let mut config = valid_config();
        config.watcher.channel_capacity = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("channel_capacity"));
    }

    #[test]
    fn validate_rejects_empty_death_keyword() {
        let mut config = valid_config();
        config.watcher.death_keywords = vec![" exploded".to_owned(), String::new()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("death_keywords"));
    }

    #[test]
    fn validate_rejects_out_of_range_poll_interval() {
        let mut config = valid_config();
        config.watcher.poll_interval_ms = 0;
        assert!(config.validate().is_err());
        config.watcher.poll_interval_ms = MAX_POLL_INTERVAL_MS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_checks_metrics_endpoint_only_when_enabled() {
        let mut config = valid_config();
        config.metrics.endpoint = "/stats".to_owned();
        config.validate().unwrap();

        config.metrics.enabled = true;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("metrics.endpoint"));
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = DolphinConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.watcher.max_line_length, 64 * 1024);
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[watcher]
log_path = "/srv/mc/logs/latest.log"
death_keywords = [" was obliterated", " exploded"]

[delivery]
host = "discord-bridge"
port = 8080
"#;
        let config = DolphinConfig::parse(toml).unwrap();
        assert_eq!(config.watcher.log_path, "/srv/mc/logs/latest.log");
        assert_eq!(config.watcher.death_keywords.len(), 2);
        // poll_interval_ms는 기본값 유지
        assert_eq!(config.watcher.poll_interval_ms, 250);
        assert_eq!(config.delivery.endpoint(), "http://discord-bridge:8080");
        config.validate().unwrap();
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = DolphinConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            DolphinError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: 테스트마다 고유한 환경변수 키를 사용합니다.
        unsafe { std::env::set_var("TEST_DOLPHIN_STR", "overridden") };
        override_string(&mut val, "TEST_DOLPHIN_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_DOLPHIN_STR") };
    }

    #[test]
    fn env_override_u16_invalid_keeps_original() {
        let mut val = 5000u16;
        // SAFETY: 테스트마다 고유한 환경변수 키를 사용합니다.
        unsafe { std::env::set_var("TEST_DOLPHIN_U16_BAD", "99999") };
        override_u16(&mut val, "TEST_DOLPHIN_U16_BAD");
        assert_eq!(val, 5000);
        unsafe { std::env::remove_var("TEST_DOLPHIN_U16_BAD") };
    }

    #[test]
    fn env_override_csv_keeps_leading_spaces() {
        let mut val = Vec::new();
        // SAFETY: 테스트마다 고유한 환경변수 키를 사용합니다.
        unsafe { std::env::set_var("TEST_DOLPHIN_CSV", " exploded, was obliterated") };
        override_csv(&mut val, "TEST_DOLPHIN_CSV");
        assert_eq!(val, vec![" exploded", " was obliterated"]);
        unsafe { std::env::remove_var("TEST_DOLPHIN_CSV") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_DOLPHIN_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = valid_config();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = DolphinConfig::parse(&toml_str).unwrap();
        assert_eq!(config.watcher.log_path, parsed.watcher.log_path);
        assert_eq!(config.delivery.port, parsed.delivery.port);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = DolphinConfig::from_file("/nonexistent/path/dolphin.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DolphinError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
