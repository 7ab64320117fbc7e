//! 플레이어 이름 → UUID 캐시
//!
//! 인증 로그 라인(`UUID of player <name> is <uuid>`)에서 채워지고,
//! 플레이어가 나가면(`<name> left the game`) 제거됩니다.
//! 분류기가 단독으로 소유하고 변경하므로 잠금이 필요 없습니다.

use std::collections::HashMap;

/// 플레이어 표시 이름(대소문자 구분) → UUID 매핑
#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    entries: HashMap<String, String>,
}

impl IdentityCache {
    /// 빈 캐시를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 플레이어의 UUID를 기록합니다. 기존 값은 덮어씁니다.
    pub fn insert(&mut self, name: impl Into<String>, uuid: impl Into<String>) {
        self.entries.insert(name.into(), uuid.into());
    }

    /// 플레이어의 UUID를 조회합니다.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// 플레이어를 캐시에서 제거합니다. 없는 이름이면 아무 일도 하지 않습니다.
    pub fn remove(&mut self, name: &str) {
        self.entries.remove(name);
    }

    /// 플레이어가 캐시에 있는지 확인합니다.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// 캐시된 플레이어 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 캐시가 비었는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
