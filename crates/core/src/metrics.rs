//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`
//! 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `dolphin_`
//! - 모듈명: `watcher_`, `delivery_`
//! - 접미어: `_total` (counter), 없음 (gauge)

use metrics::{describe_counter, describe_gauge};

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 메시지 분류 레이블 키 (chat, join_leave, advancement, server_started, server_stopping, death)
pub const LABEL_CATEGORY: &str = "category";

// ─── Log Watcher 메트릭 ────────────────────────────────────────────

/// Watcher: 읽은 전체 로그 라인 수 (counter)
pub const WATCHER_LINES_READ_TOTAL: &str = "dolphin_watcher_lines_read_total";

/// Watcher: 최대 길이 초과로 버린 라인 수 (counter)
pub const WATCHER_LINES_DROPPED_TOTAL: &str = "dolphin_watcher_lines_dropped_total";

/// Watcher: 분류된 메시지 수 (counter, label: category)
pub const WATCHER_MESSAGES_TOTAL: &str = "dolphin_watcher_messages_total";

/// Watcher: 로그 파일 로테이션/트렁케이션 감지 수 (counter)
pub const WATCHER_ROTATIONS_TOTAL: &str = "dolphin_watcher_rotations_total";

/// Watcher: UUID 캐시 크기 (gauge)
pub const WATCHER_IDENTITY_CACHE_SIZE: &str = "dolphin_watcher_identity_cache_size";

// ─── Delivery 메트릭 ────────────────────────────────────────────────

/// Delivery: 전송 성공 수 (counter)
pub const DELIVERY_MESSAGES_SENT_TOTAL: &str = "dolphin_delivery_messages_sent_total";

/// Delivery: 전송 실패 수 (counter)
pub const DELIVERY_FAILURES_TOTAL: &str = "dolphin_delivery_failures_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 메트릭 레코더 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    describe_counter!(WATCHER_LINES_READ_TOTAL, "Total log lines read from the server log");
    describe_counter!(
        WATCHER_LINES_DROPPED_TOTAL,
        "Log lines dropped for exceeding the maximum line length"
    );
    describe_counter!(WATCHER_MESSAGES_TOTAL, "Messages produced by the line classifier");
    describe_counter!(
        WATCHER_ROTATIONS_TOTAL,
        "Log file rotations or truncations detected"
    );
    describe_gauge!(
        WATCHER_IDENTITY_CACHE_SIZE,
        "Number of players currently in the UUID cache"
    );
    describe_counter!(
        DELIVERY_MESSAGES_SENT_TOTAL,
        "Messages delivered to the remote endpoint"
    );
    describe_counter!(DELIVERY_FAILURES_TOTAL, "Messages dropped after a failed delivery");
}
