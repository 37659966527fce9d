//! Single-threaded LRU: recency order, peek vs get, and bulk removal.
//!
//! Run with: cargo run --example basic_lru

use lrukit::lru::LruCore;

fn main() {
    println!("=== LruCore ===\n");

    let mut cache: LruCore<u64, String> = LruCore::new(3);
    cache.put(1, "one".to_string());
    cache.put(2, "two".to_string());
    cache.put(3, "three".to_string());

    // get moves 1 to the front; peek leaves 2 where it is
    cache.get(&1);
    cache.peek(&2);

    // 2 is now least recently used and goes first
    cache.put(4, "four".to_string());

    println!("keys (MRU first): {:?}", cache.all_keys());
    println!("contains 2? {} (evicted)", cache.contains(&2));
    if let Some((key, value)) = cache.least_recently_used() {
        println!("least recently used: {} => {}", key, value);
    }

    println!("\nscan until the first odd key:");
    cache.scan(|key, value| {
        println!("   {} => {}", key, value);
        key % 2 == 0
    });

    let removed = cache.remove_if(|key| *key > 2);
    println!("\nremove_if(key > 2) removed {}, left {:?}", removed, cache.all_keys());

    cache.remove_all();
    println!("after remove_all: count={} size={}", cache.count(), cache.size());
}
