//! 로그 라인 접두사 제거
//!
//! Minecraft 서버 로그는 `[12:32:45] [Server thread/INFO]: ` 형태의 접두사로 시작합니다.
//! [`strip_prefix`]는 이 접두사를 잘라내고 본문만 반환합니다.

/// 이보다 짧은 라인은 형식이 잘못된 것으로 간주 (바이트)
pub const MIN_LINE_LENGTH: usize = 10;

/// 접두사와 본문 사이 구분자
const PREFIX_DELIMITER: &str = "]: ";

/// 원시 로그 라인에서 시각/스레드 접두사를 제거합니다.
///
/// `[`로 시작하지 않거나, [`MIN_LINE_LENGTH`]보다 짧거나, 구분자 `"]: "`가 없는
/// 라인은 빈 문자열을 반환합니다. 일부 서버 플러그인은 이런 비정상 라인을 남깁니다.
/// 그 외에는 첫 번째 `"]: "` 뒤의 문자열에서 끝 공백을 제거해 반환합니다.
pub fn strip_prefix(line: &str) -> &str {
    if !line.starts_with('[') || line.len() < MIN_LINE_LENGTH {
        return "";
    }

    match line.find(PREFIX_DELIMITER) {
        Some(idx) => line[idx + PREFIX_DELIMITER.len()..].trim_end(),
        None => "",
    }
}
