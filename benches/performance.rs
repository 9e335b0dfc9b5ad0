//! Performance benchmarks for the hot paths of a run
//!
//! Request bookkeeping, statistics and summary rendering all sit between
//! responses arriving and the next console line; the echo handler's
//! reversal runs once per request on the service side.

use chrono::Utc;
use clap::Parser;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use reverse_load_tester::{
    cli::Cli,
    config::parser::ConfigParser,
    executor::payload_for,
    models::{RequestRecord, RunResult},
    output::render_summary_text,
    server::{extract_text, reverse_text},
    stats::LatencyStatistics,
    types::{RunKind, Target},
};
use std::hint::black_box;
use std::time::Duration;

fn sample_latencies(count: usize) -> Vec<Duration> {
    (0..count)
        .map(|i| Duration::from_micros(800 + (i as u64 * 7919) % 4000))
        .collect()
}

fn sample_run(kind: RunKind, count: usize) -> RunResult {
    let corpus: Vec<String> = reverse_load_tester::defaults::CORPUS.iter().map(|s| s.to_string()).collect();
    let mut result = RunResult::new(Target::Swarm, kind);
    for (i, latency) in sample_latencies(count).into_iter().enumerate() {
        let payload = payload_for(&corpus, i).unwrap_or_default().to_string();
        let reversed = reverse_text(&payload);
        result.record(RequestRecord::success(i, payload, Utc::now(), latency, reversed));
    }
    result.finish(Duration::from_secs(1));
    result
}

fn benchmark_echo_handler(c: &mut Criterion) {
    let mut group = c.benchmark_group("echo_handler");

    group.bench_function("reverse_text", |b| {
        b.iter(|| black_box(reverse_text(black_box("5PKOHcL6OuxRd0xXHQ"))));
    });

    group.bench_function("extract_text", |b| {
        let body = br#"{"text": "NkmPg9jT2uMwWvQ9"}"#;
        b.iter(|| black_box(extract_text(black_box(body))));
    });

    group.finish();
}

fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for size in [100usize, 1_000, 10_000] {
        let latencies = sample_latencies(size);
        group.bench_with_input(BenchmarkId::new("from_latencies", size), &latencies, |b, latencies| {
            b.iter(|| black_box(LatencyStatistics::from_latencies(black_box(latencies))));
        });
    }

    group.finish();
}

fn benchmark_run_bookkeeping(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_bookkeeping");

    group.bench_function("record_10000", |b| {
        b.iter(|| black_box(sample_run(RunKind::Bulk, 10_000)));
    });

    let canned = sample_run(RunKind::Canned, 10);
    group.bench_function("render_canned_summary", |b| {
        b.iter(|| black_box(render_summary_text(black_box(&canned))));
    });

    group.finish();
}

fn benchmark_config_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_parsing");

    let args = [
        "rlt",
        "--target", "both",
        "--k8s-url", "http://localhost:52396/reverse",
        "-n", "10000",
        "-r", "300",
        "-c", "50",
    ];

    group.bench_function("parse_cli_args", |b| {
        b.iter(|| black_box(Cli::try_parse_from(black_box(args)).unwrap()));
    });

    group.bench_function("parse_and_validate", |b| {
        let cli = Cli::try_parse_from(args).unwrap();
        b.iter(|| black_box(ConfigParser::new(cli.clone()).parse().unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_echo_handler,
    benchmark_statistics,
    benchmark_run_bookkeeping,
    benchmark_config_parsing
);
criterion_main!(benches);
