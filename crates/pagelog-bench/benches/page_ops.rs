//! Criterion micro-benchmarks for layout, write, lookup, and clear operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use pagelog::arena::{compute_layout, ArenaLayout};
use pagelog::types::SystemAllocator;
use pagelog::PageLogger;
use pagelog_bench::{reference_config, sample_lines, stress_config};
use pagelog_test_utils::CountingAllocator;

/// Benchmark: Total-size computation for the stress profile.
fn bench_layout_compute(c: &mut Criterion) {
    let config = stress_config();
    c.bench_function("layout_compute_64x4k", |b| {
        b.iter(|| {
            let layout = ArenaLayout::compute(black_box(&config)).unwrap();
            black_box(layout.total_bytes());
        });
    });
    c.bench_function("compute_layout_8x256", |b| {
        b.iter(|| black_box(compute_layout(black_box(8), black_box(256))));
    });
}

/// Benchmark: Create and drop a logger, including the single allocation.
fn bench_create_destroy(c: &mut Criterion) {
    c.bench_function("create_destroy_8x256", |b| {
        b.iter(|| {
            let logger =
                PageLogger::create_in(reference_config(), CountingAllocator::new()).unwrap();
            black_box(logger.page_amount());
        });
    });
}

/// Benchmark: Fill every page of the reference profile with line writes.
fn bench_write_lines(c: &mut Criterion) {
    let lines = sample_lines(256);
    let mut logger = PageLogger::create_in(reference_config(), SystemAllocator).unwrap();
    c.bench_function("write_lines_until_full", |b| {
        b.iter(|| {
            logger.clear_all();
            let pages = logger.page_amount();
            for (i, line) in lines.iter().enumerate() {
                let _ = black_box(logger.write_line(i % pages, line.as_bytes()));
            }
        });
    });
}

/// Benchmark: Page lookup and view construction across the stress profile.
fn bench_page_lookup(c: &mut Criterion) {
    let mut logger = PageLogger::create_in(stress_config(), SystemAllocator).unwrap();
    for (i, line) in sample_lines(64).iter().enumerate() {
        logger.write_str(i, line).unwrap();
    }
    c.bench_function("page_lookup_64", |b| {
        b.iter(|| {
            let used: usize = logger.pages().map(|p| p.used()).sum();
            black_box(used);
        });
    });
}

/// Benchmark: Clear-all over 64 dirty pages.
fn bench_clear_all(c: &mut Criterion) {
    let mut logger = PageLogger::create_in(stress_config(), SystemAllocator).unwrap();
    let lines = sample_lines(64);
    c.bench_function("clear_all_64", |b| {
        b.iter(|| {
            for (i, line) in lines.iter().enumerate() {
                logger.write_str(i, line).unwrap();
            }
            logger.clear_all();
            black_box(logger.page(0).map(|p| p.remaining()));
        });
    });
}

criterion_group!(
    benches,
    bench_layout_compute,
    bench_create_destroy,
    bench_write_lines,
    bench_page_lookup,
    bench_clear_all
);
criterion_main!(benches);
