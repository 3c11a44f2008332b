//! Lookup and ingestion benchmarks
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nsuggest::index::build::build_filter_from_bytes;
use nsuggest::index::{BuildConfig, MIN_PREFIX_LENGTH};
use nsuggest::query::{BloomNameLookup, NameLookup, SortedNameLookup};

/// Synthetic surname-like names: a few shared stems with varied endings
fn synthetic_names(count: usize) -> String {
    const STEMS: [&str; 8] = ["smith", "john", "will", "harr", "brown", "mart", "ander", "thom"];
    const ENDS: [&str; 10] = ["", "s", "son", "sen", "er", "ers", "ington", "ley", "ford", "by"];

    let mut out = String::new();
    for i in 0..count {
        let stem = STEMS[i % STEMS.len()];
        let end = ENDS[(i / STEMS.len()) % ENDS.len()];
        let suffix = (i / (STEMS.len() * ENDS.len())) as u32;
        out.push_str(stem);
        out.push_str(end);
        // Spread names out in base 26 once the fixed combinations run out
        let mut n = suffix;
        while n > 0 {
            out.push((b'a' + (n % 26) as u8) as char);
            n /= 26;
        }
        out.push('\n');
    }
    out
}

fn config(names: usize) -> BuildConfig {
    BuildConfig {
        expected_insertions: names * 8,
        false_positive_probability: 0.01,
        min_prefix_length: MIN_PREFIX_LENGTH,
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(10);
    for count in [10_000, 100_000] {
        let names = synthetic_names(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &names, |b, names| {
            b.iter(|| build_filter_from_bytes(black_box(names.as_bytes()), &config(count), true))
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let count = 100_000;
    let names = synthetic_names(count);
    let (filter, _) = build_filter_from_bytes(names.as_bytes(), &config(count), true)
        .expect("Failed to build filter");
    let bloom = BloomNameLookup::new(filter);
    let exact = SortedNameLookup::from_lines(names.as_bytes(), MIN_PREFIX_LENGTH)
        .expect("Failed to build name table");

    let mut group = c.benchmark_group("lookup");
    for max in [3, 10] {
        for prefix in ["smit", "john", "zzzz"] {
            let id = format!("{prefix}/{max}");
            group.bench_with_input(BenchmarkId::new("bloom", &id), &prefix, |b, prefix| {
                b.iter(|| bloom.lookup_tokens(black_box(prefix), max))
            });
            group.bench_with_input(BenchmarkId::new("bloom_parallel", &id), &prefix, |b, prefix| {
                b.iter(|| bloom.lookup_parallel(black_box(prefix), max))
            });
            group.bench_with_input(BenchmarkId::new("exact", &id), &prefix, |b, prefix| {
                b.iter(|| exact.lookup_tokens(black_box(prefix), max))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_lookup);
criterion_main!(benches);
