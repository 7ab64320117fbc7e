#![no_main]

use arbitrary::Arbitrary;
use dolphin_log_watcher::LineClassifier;
use libfuzzer_sys::fuzz_target;

/// 한 세션 동안 분류기에 들어오는 라인 묶음
#[derive(Debug, Arbitrary)]
struct Session {
    custom_keywords: Vec<String>,
    lines: Vec<String>,
}

fuzz_target!(|session: Session| {
    // 빈 키워드는 설정 검증에서 거부되므로 제외
    let keywords: Vec<String> = session
        .custom_keywords
        .into_iter()
        .filter(|k| !k.is_empty())
        .take(8)
        .collect();
    let mut classifier = LineClassifier::new(keywords);

    for line in session.lines.iter().take(64) {
        let _ = classifier.parse_line(line);
        let _ = classifier.classify(line);
    }
});
