use std::sync::Arc;
use std::thread;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use lrukit::lru::{ConcurrentLruCache, LruCore};
use lrukit::sharded::ShardedLruCache;
use lrukit::strategy::NoopListener;

fn filled(max_size: isize, n: u64) -> LruCore<u64, u64> {
    let mut cache = LruCore::new(max_size);
    for i in 0..n {
        cache.put(i, i);
    }
    cache
}

fn bench_lru_put_get(c: &mut Criterion) {
    c.bench_function("lru_put_get", |b| {
        b.iter_batched(
            || filled(1024, 1024),
            |mut cache| {
                for i in 0..1024u64 {
                    cache.put(std::hint::black_box(i + 10_000), i);
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_eviction_churn(c: &mut Criterion) {
    c.bench_function("lru_eviction_churn", |b| {
        b.iter_batched(
            || filled(1024, 1024),
            |mut cache| {
                for i in 0..4096u64 {
                    cache.put(std::hint::black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_cost_churn(c: &mut Criterion) {
    c.bench_function("lru_cost_churn", |b| {
        b.iter_batched(
            || LruCore::with_policies(64 * 1024, |_: &u64, v: &Vec<u8>| v.len(), NoopListener),
            |mut cache| {
                for i in 0..4096u64 {
                    let len = 16 + (i % 48) as usize;
                    cache.put(std::hint::black_box(i), vec![0u8; len]);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_peek_hotset(c: &mut Criterion) {
    c.bench_function("lru_peek_hotset", |b| {
        b.iter_batched(
            || filled(4096, 4096),
            |cache| {
                for i in 0..4096u64 {
                    let _ = std::hint::black_box(cache.peek(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_remove_if(c: &mut Criterion) {
    c.bench_function("lru_remove_if_half", |b| {
        b.iter_batched(
            || filled(4096, 4096),
            |mut cache| std::hint::black_box(cache.remove_if(|k| k % 2 == 0)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_scan(c: &mut Criterion) {
    let cache = filled(4096, 4096);
    c.bench_function("lru_scan_full", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            cache.scan(|_, v| {
                sum = sum.wrapping_add(*v);
                true
            });
            std::hint::black_box(sum)
        })
    });
}

/// Mixed get/put traffic from several threads against one lock versus shards.
fn bench_contention(c: &mut Criterion) {
    const THREADS: u64 = 4;
    const OPS: u64 = 10_000;

    let mut group = c.benchmark_group("contention");

    group.bench_function(BenchmarkId::new("single_lock", THREADS), |b| {
        b.iter(|| {
            let cache: ConcurrentLruCache<u64, u64> = ConcurrentLruCache::new(4096);
            let handles: Vec<_> = (0..THREADS)
                .map(|t| {
                    let cache = cache.clone();
                    thread::spawn(move || {
                        for i in 0..OPS {
                            let key = (t * OPS + i) % 8192;
                            if cache.get(&key).is_none() {
                                cache.put(key, i);
                            }
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
        })
    });

    group.bench_function(BenchmarkId::new("sharded_16", THREADS), |b| {
        b.iter(|| {
            let cache: Arc<ShardedLruCache<u64, u64>> = Arc::new(ShardedLruCache::new(16, 4096));
            let handles: Vec<_> = (0..THREADS)
                .map(|t| {
                    let cache = Arc::clone(&cache);
                    thread::spawn(move || {
                        for i in 0..OPS {
                            let key = (t * OPS + i) % 8192;
                            if cache.get(&key).is_none() {
                                cache.put(key, i);
                            }
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lru_put_get,
    bench_lru_eviction_churn,
    bench_lru_cost_churn,
    bench_lru_peek_hotset,
    bench_lru_remove_if,
    bench_lru_scan,
    bench_contention
);
criterion_main!(benches);
