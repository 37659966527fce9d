/// Point-in-time copy of an LRU cache's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,

    pub remove_calls: u64,
    pub remove_found: u64,
    pub remove_if_calls: u64,
    pub remove_if_removed: u64,
    pub clear_calls: u64,

    pub peek_calls: u64,
    pub peek_found: u64,
    pub scan_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub cache_size: usize,
    pub max_size: isize,
}

impl LruMetricsSnapshot {
    /// Fraction of `get` calls that hit, or 0.0 before the first call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }

    /// Adds another snapshot's counters and gauges into this one.
    ///
    /// Used to fold per-shard snapshots into a cache-wide view.
    pub fn merge(&mut self, other: &Self) {
        self.get_calls += other.get_calls;
        self.get_hits += other.get_hits;
        self.get_misses += other.get_misses;
        self.insert_calls += other.insert_calls;
        self.insert_updates += other.insert_updates;
        self.insert_new += other.insert_new;
        self.evict_calls += other.evict_calls;
        self.evicted_entries += other.evicted_entries;
        self.remove_calls += other.remove_calls;
        self.remove_found += other.remove_found;
        self.remove_if_calls += other.remove_if_calls;
        self.remove_if_removed += other.remove_if_removed;
        self.clear_calls += other.clear_calls;
        self.peek_calls += other.peek_calls;
        self.peek_found += other.peek_found;
        self.scan_calls += other.scan_calls;
        self.cache_len += other.cache_len;
        self.cache_size += other.cache_size;
        self.max_size = self.max_size.saturating_add(other.max_size);
    }
}
