//! 에러 타입 -- 도메인별 에러 정의

/// Dolphin 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum DolphinError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 이미 실행 중인 파이프라인을 다시 시작하려 함
    #[error("pipeline is already running")]
    AlreadyRunning,

    /// 실행 중이 아닌 파이프라인을 정지하려 함
    #[error("pipeline is not running")]
    NotRunning,

    /// 채널 전송 실패
    #[error("channel send failed: {0}")]
    ChannelSend(String),

    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 실행 중 로그 소스가 복구 불가능하게 실패
    #[error("log source failed: {0}")]
    SourceFailed(String),
}

/// 메시지 전송 에러
///
/// 전송 실패는 재시도하지 않습니다. 호출자는 로그만 남기고 다음 메시지로 넘어갑니다.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// JSON 직렬화 실패
    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 네트워크 요청 실패
    #[error("request to {endpoint} failed: {reason}")]
    Request { endpoint: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_dolphin_error() {
        let err: DolphinError = ConfigError::FileNotFound {
            path: "/etc/dolphin/dolphin.toml".to_owned(),
        }
        .into();
        assert!(matches!(err, DolphinError::Config(_)));
        assert!(err.to_string().contains("dolphin.toml"));
    }

    #[test]
    fn invalid_value_display_names_field() {
        let err = ConfigError::InvalidValue {
            field: "delivery.port".to_owned(),
            reason: "must not be 0".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("delivery.port"));
        assert!(msg.contains("must not be 0"));
    }

    #[test]
    fn delivery_request_error_display() {
        let err = DeliveryError::Request {
            endpoint: "http://127.0.0.1:5000".to_owned(),
            reason: "connection refused".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:5000"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn pipeline_state_errors_display() {
        assert_eq!(
            PipelineError::AlreadyRunning.to_string(),
            "pipeline is already running"
        );
        assert_eq!(PipelineError::NotRunning.to_string(), "pipeline is not running");
    }
}
