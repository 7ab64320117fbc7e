#![no_main]

use dolphin_log_watcher::strip_prefix;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    let stripped = strip_prefix(&line);

    // 결과는 항상 입력의 일부이며 끝 공백이 없어야 함
    assert!(line.contains(stripped));
    assert_eq!(stripped, stripped.trim_end());
    if !line.starts_with('[') {
        assert!(stripped.is_empty());
    }
});
