//! Benchmarks for snapshot construction and the constant-time queries it enables.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tally::{Recorder, Snapshot};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn populated_recorder() -> Recorder {
    let mut recorder = Recorder::new();

    for value in 0..1000 {
        recorder.record_many(value, u64::try_from(value % 7).unwrap()).unwrap();
    }

    recorder
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("tally");

    let mut recorder = populated_recorder();

    group.bench_function("record", |b| {
        b.iter(|| recorder.record(black_box(500)));
    });

    let recorder = populated_recorder();

    group.bench_function("snapshot_1000", |b| {
        b.iter(|| black_box(&recorder).snapshot());
    });

    let snapshot: Snapshot = recorder.snapshot();

    group.bench_function("less", |b| {
        b.iter(|| snapshot.less(black_box(500)));
    });

    group.bench_function("greater", |b| {
        b.iter(|| snapshot.greater(black_box(500)));
    });

    group.bench_function("between", |b| {
        b.iter(|| snapshot.between(black_box(100), black_box(900)));
    });

    group.finish();
}
