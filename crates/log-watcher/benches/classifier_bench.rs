//! 라인 분류기 벤치마크
//!
//! 접두사 제거와 규칙 평가의 처리량을 측정합니다.
//! 사망 키워드 검사는 모든 규칙을 통과한 라인에서만 일어나므로 가장 비싼 경로입니다.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dolphin_log_watcher::{strip_prefix, LineClassifier};

const CHAT: &str = "[12:32:45] [Async Chat Thread - #0/INFO]: <TestUser> Sending a chat message";
const JOIN: &str = "[12:32:45] [Server thread/INFO]: TestUser joined the game";
const DEATH: &str = "[12:32:45] [Server thread/INFO]: TestUser was pummeled by Zombie";
const NOISE: &str = "[12:32:45] [Worker-Main-2/INFO]: Preparing spawn area: 83%";
const MALFORMED: &str = "java.lang.IllegalStateException: no prefix on this line";

fn bench_strip_prefix(c: &mut Criterion) {
    let mut group = c.benchmark_group("strip_prefix");
    group.throughput(Throughput::Elements(1));

    group.bench_function("vanilla", |b| b.iter(|| strip_prefix(black_box(CHAT))));
    group.bench_function("malformed", |b| b.iter(|| strip_prefix(black_box(MALFORMED))));

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut classifier = LineClassifier::default();

    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(1));

    group.bench_function("chat", |b| b.iter(|| classifier.parse_line(black_box(CHAT))));
    group.bench_function("join", |b| b.iter(|| classifier.parse_line(black_box(JOIN))));
    group.bench_function("death_keyword_scan", |b| {
        b.iter(|| classifier.parse_line(black_box(DEATH)))
    });
    group.bench_function("no_match_full_scan", |b| {
        b.iter(|| classifier.parse_line(black_box(NOISE)))
    });

    // 실제 서버 로그와 비슷한 혼합 처리량
    let mixed = [CHAT, NOISE, NOISE, JOIN, NOISE, DEATH, MALFORMED, NOISE];
    group.throughput(Throughput::Elements(1000));
    group.bench_function("mixed_throughput_1000", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let _ = classifier.parse_line(black_box(mixed[i % mixed.len()]));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_strip_prefix, bench_classify);
criterion_main!(benches);
