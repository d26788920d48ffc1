use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hoststat::{metrics::mock::MockProvider, HistoryBuffer, Reading, Sampler, SamplerConfig, StateStore};
use std::hint::black_box;

fn reading(i: u32) -> Reading {
    Reading {
        cpu_usage_percent: (i % 101) as u8,
        mem_usage_percent: (100 - i % 101) as u8,
    }
}

/// Benchmark appending to a full history buffer
fn bench_history_append(c: &mut Criterion) {
    let mut history = HistoryBuffer::new();
    let mut i = 0u32;

    c.bench_function("history_append", |b| {
        b.iter(|| {
            i = i.wrapping_add(1);
            history.append(black_box(reading(i)));
        })
    });
}

/// Benchmark copying the history out for a reader
fn bench_history_snapshot(c: &mut Criterion) {
    let mut history = HistoryBuffer::new();
    for i in 0..137 {
        history.append(reading(i));
    }

    c.bench_function("history_snapshot", |b| b.iter(|| black_box(history.snapshot())));
}

/// Benchmark JSON serialization of the history payload
fn bench_history_serialization(c: &mut Criterion) {
    let mut history = HistoryBuffer::new();
    for i in 0..100 {
        history.append(reading(i));
    }
    let snapshot = history.snapshot();

    c.bench_function("history_json_serialization", |b| {
        b.iter(|| serde_json::to_string(black_box(&snapshot)).expect("Should serialize"))
    });
}

/// Benchmark a sampling cycle against a provider with no measurement window
fn bench_sampler_cycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");

    for extended_every in [1u32, 10].iter() {
        c.bench_with_input(
            BenchmarkId::new("sampler_cycle", extended_every),
            extended_every,
            |b, &extended_every| {
                let state = StateStore::shared();
                let config = SamplerConfig::default().with_extended_every(extended_every);
                let mut sampler =
                    Sampler::new(MockProvider::new(), state, config).expect("Should create sampler");
                b.iter(|| rt.block_on(sampler.run_cycle()));
            },
        );
    }
}

/// Benchmark concurrent readers against the shared state
fn bench_concurrent_reads(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");
    let state = StateStore::shared();

    for readers in [1usize, 4, 16].iter() {
        c.bench_with_input(
            BenchmarkId::new("concurrent_history_reads", readers),
            readers,
            |b, &readers| {
                b.to_async(&rt).iter(|| {
                    let state = state.clone();
                    async move {
                        let handles: Vec<_> = (0..readers)
                            .map(|_| {
                                let state = state.clone();
                                tokio::spawn(async move { state.history_snapshot().await })
                            })
                            .collect();
                        for handle in handles {
                            black_box(handle.await.expect("Reader should finish"));
                        }
                    }
                })
            },
        );
    }
}

criterion_group!(
    benches,
    bench_history_append,
    bench_history_snapshot,
    bench_history_serialization,
    bench_sampler_cycle,
    bench_concurrent_reads
);
criterion_main!(benches);
