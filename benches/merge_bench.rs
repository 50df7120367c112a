//! Benchmarks for merging and analyzing measurements
//!
//! Run with: cargo bench

use bm65::analysis::{average, class_distribution, median, standard_deviation};
use bm65::storage::{load_file, merge, merge_all, save_file, Measurement};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tempfile::tempdir;

/// One reading per hour, oldest first, so the merge has to reorder
fn create_test_measurements(count: usize, offset: usize) -> Vec<Measurement> {
    (0..count)
        .map(|i| {
            let hour = i + offset;
            let day = (hour / 24) % 28 + 1;
            let month = (hour / (24 * 28)) % 12 + 1;
            Measurement::new(110 + (i % 50) as i32, 70 + (i % 30) as i32, 55 + (i % 40) as i32)
                .at(2016, month as i32, day as i32, (hour % 24) as i32, (i % 60) as i32)
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [60, 255, 2000] {
        let old = create_test_measurements(size, 0);
        // Half overlapping with `old`
        let new = create_test_measurements(size, size / 2);

        group.throughput(Throughput::Elements((size * 2) as u64));

        group.bench_function(format!("merge_{}", size), |b| {
            b.iter(|| merge(black_box(&new), black_box(&old)))
        });

        group.bench_function(format!("merge_all_{}", size), |b| {
            b.iter(|| merge_all(vec![new.clone(), old.clone(), old.clone()]))
        });
    }

    group.finish();
}

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    for size in [60, 2000] {
        let items = merge(&create_test_measurements(size, 0), &[]);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("average_{}", size), |b| {
            b.iter(|| average(black_box(&items)).unwrap())
        });

        group.bench_function(format!("median_{}", size), |b| {
            b.iter(|| median(black_box(&items)).unwrap())
        });

        group.bench_function(format!("standard_deviation_{}", size), |b| {
            b.iter(|| standard_deviation(black_box(&items)).unwrap())
        });

        group.bench_function(format!("class_distribution_{}", size), |b| {
            b.iter(|| class_distribution(black_box(&items)).unwrap())
        });
    }

    group.finish();
}

fn bench_record_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_file");

    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.json");
    let items = merge(&create_test_measurements(2000, 0), &[]);

    group.bench_function("save_2000", |b| {
        b.iter(|| save_file(&path, black_box(&items)).unwrap())
    });

    save_file(&path, &items).unwrap();

    group.bench_function("load_2000", |b| b.iter(|| load_file(&path).unwrap()));

    group.finish();
}

criterion_group!(benches, bench_merge, bench_stats, bench_record_file);
criterion_main!(benches);
