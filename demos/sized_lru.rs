//! Byte-budgeted cache shared across threads, with an eviction listener.
//!
//! Run with: cargo run --example sized_lru

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use lrukit::builder::LruCacheBuilder;

fn main() {
    let evicted_bytes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evicted_bytes);

    // Budget is 4 KiB of payload, not a number of entries.
    let cache = LruCacheBuilder::<String, Vec<u8>>::new(4096)
        .cost_fn(|key, value| key.len() + value.len())
        .on_evict(move |key, value| {
            counter.fetch_add(key.len() + value.len(), Ordering::Relaxed);
        })
        .build();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let key = format!("worker{}-item{}", worker, i);
                    cache.put(key, vec![0u8; 16 + (i % 64)]);
                }
            })
        })
        .collect();
    for handle in handles {
        if handle.join().is_err() {
            eprintln!("worker panicked");
        }
    }

    println!("entries resident: {}", cache.count());
    println!("bytes resident:   {} / {}", cache.size(), cache.max_size());
    println!("bytes evicted:    {}", evicted_bytes.load(Ordering::Relaxed));

    let sharded = LruCacheBuilder::<u64, u64>::new(1000).build_sharded(8);
    for i in 0..5000 {
        sharded.put(i, i * i);
    }
    println!(
        "\nsharded: {} shards, {} entries, invariants ok: {}",
        sharded.shard_count(),
        sharded.count(),
        sharded.check_invariants().is_ok()
    );
}
