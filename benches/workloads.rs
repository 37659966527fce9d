//! Hit-rate benchmarks under synthetic access patterns.
//!
//! Run with: `cargo bench --bench workloads`
//!
//! Compares entry-count budgets against byte budgets (variable value sizes)
//! over the same key streams.

mod common;

use std::time::{Duration, Instant};

use common::workload::{Workload, WorkloadSpec, run_hit_rate};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lrukit::lru::LruCore;
use lrukit::strategy::NoopListener;

const UNIVERSE: u64 = 16_384;
const OPS: usize = 200_000;
const SEED: u64 = 42;
const CAPACITY: isize = 4096;

fn workloads() -> Vec<(&'static str, Workload)> {
    vec![
        ("uniform", Workload::Uniform),
        (
            "hotset_90_10",
            Workload::HotSet {
                hot_fraction: 0.1,
                hot_prob: 0.9,
            },
        ),
        ("scan", Workload::Scan),
        ("zipfian_1.0", Workload::Zipfian { exponent: 1.0 }),
    ]
}

fn generator(workload: Workload) -> common::workload::WorkloadGenerator {
    WorkloadSpec {
        universe: UNIVERSE,
        workload,
        seed: SEED,
    }
    .generator()
}

/// Value sized 8..=64 bytes, derived from the key.
fn sized_value(key: u64) -> Vec<u8> {
    vec![0u8; 8 + (key % 57) as usize]
}

fn bench_hit_rates(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_rate");
    group.throughput(Throughput::Elements(OPS as u64));

    for (workload_name, workload) in workloads() {
        group.bench_with_input(
            BenchmarkId::new("unit_cost", workload_name),
            &workload,
            |b, &wl| {
                b.iter_custom(|iters| {
                    let mut total = Duration::default();
                    for _ in 0..iters {
                        let mut cache: LruCore<u64, u64> = LruCore::new(CAPACITY);
                        let mut keys = generator(wl);
                        let start = Instant::now();
                        let _ = run_hit_rate(&mut cache, &mut keys, OPS, |k| k);
                        total += start.elapsed();
                    }
                    total
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("byte_cost", workload_name),
            &workload,
            |b, &wl| {
                b.iter_custom(|iters| {
                    let mut total = Duration::default();
                    for _ in 0..iters {
                        let mut cache = LruCore::with_policies(
                            CAPACITY * 36,
                            |_: &u64, v: &Vec<u8>| v.len(),
                            NoopListener,
                        );
                        let mut keys = generator(wl);
                        let start = Instant::now();
                        let _ = run_hit_rate(&mut cache, &mut keys, OPS, sized_value);
                        total += start.elapsed();
                    }
                    total
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_hit_rates);
criterion_main!(benches);

#[cfg(test)]
mod reports {
    use super::*;

    #[test]
    fn print_hit_rates() {
        println!("{:<16} {:>10}", "workload", "hit rate");
        for (name, workload) in workloads() {
            let mut cache: LruCore<u64, u64> = LruCore::new(CAPACITY);
            let stats = run_hit_rate(&mut cache, &mut generator(workload), OPS, |k| k);
            println!("{:<16} {:>9.2}%", name, stats.hit_rate() * 100.0);
        }
    }
}
