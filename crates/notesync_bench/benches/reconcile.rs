//! Reconciliation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use notesync_bench::{generate_collection, generate_incoming};
use notesync_core::{reconcile, resolve, Note};

/// Benchmark reconcile against stores of growing size.
fn bench_reconcile_store_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_store_size");

    for size in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let current = generate_collection(size);
            let incoming = generate_incoming(size, 100, 50);

            b.iter(|| {
                let merged = reconcile(black_box(current.clone()), black_box(incoming.clone()));
                black_box(merged);
            });
        });
    }

    group.finish();
}

/// Benchmark reconcile with varying id overlap.
fn bench_reconcile_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_overlap");
    let current = generate_collection(1_000);

    for overlap in [0, 50, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(overlap), overlap, |b, &overlap| {
            let incoming = generate_incoming(1_000, 1_000, overlap);

            b.iter(|| {
                let merged = reconcile(black_box(current.clone()), black_box(incoming.clone()));
                black_box(merged);
            });
        });
    }

    group.finish();
}

/// Benchmark the per-note decision.
fn bench_resolve(c: &mut Criterion) {
    let stored = Note::new(1, 1_000);
    let newer = Note::new(1, 2_000);
    let text = Note::new(1, "2024-01-01T00:00:00Z");

    c.bench_function("resolve_number", |b| {
        b.iter(|| black_box(resolve(black_box(Some(&stored)), black_box(&newer))));
    });
    c.bench_function("resolve_text", |b| {
        b.iter(|| black_box(resolve(black_box(Some(&text)), black_box(&stored))));
    });
}

criterion_group!(
    benches,
    bench_reconcile_store_size,
    bench_reconcile_overlap,
    bench_resolve
);
criterion_main!(benches);
