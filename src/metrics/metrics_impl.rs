use std::sync::atomic::{AtomicU64, Ordering};

use crate::metrics::snapshot::LruMetricsSnapshot;
use crate::metrics::traits::{CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder};

/// Counters owned by an [`LruCore`](crate::lru::LruCore).
///
/// Write-path counters are plain integers updated under `&mut self`. Read-path
/// counters are relaxed atomics because concurrent readers share the core.
#[derive(Debug, Default)]
pub struct LruMetrics {
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
    pub peek_calls: AtomicU64,
    pub peek_found: AtomicU64,
    pub scan_calls: AtomicU64,
}

impl LruMetrics {
    /// Copies the counters; gauges are filled in by the caller.
    pub fn snapshot(
        &self,
        cache_len: usize,
        cache_size: usize,
        max_size: isize,
    ) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_updates: self.insert_updates,
            insert_new: self.insert_new,
            evict_calls: self.evict_calls,
            evicted_entries: self.evicted_entries,
            remove_calls: self.remove_calls,
            remove_found: self.remove_found,
            remove_if_calls: self.remove_if_calls,
            remove_if_removed: self.remove_if_removed,
            clear_calls: self.clear_calls,
            peek_calls: self.peek_calls.load(Ordering::Relaxed),
            peek_found: self.peek_found.load(Ordering::Relaxed),
            scan_calls: self.scan_calls.load(Ordering::Relaxed),
            cache_len,
            cache_size,
            max_size,
        }
    }
}

impl CoreMetricsRecorder for LruMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl LruMetricsRecorder for LruMetrics {
    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }

    fn record_remove_if_call(&mut self) {
        self.remove_if_calls += 1;
    }

    fn record_remove_if_removed(&mut self, removed: u64) {
        self.remove_if_removed += removed;
    }
}

impl LruMetricsReadRecorder for LruMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.fetch_add(1, Ordering::Relaxed);
    }

    fn record_peek_found(&self) {
        self.peek_found.fetch_add(1, Ordering::Relaxed);
    }

    fn record_scan_call(&self) {
        self.scan_calls.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_counters_split_hits_and_misses() {
        let mut metrics = LruMetrics::default();
        metrics.record_get_hit();
        metrics.record_get_hit();
        metrics.record_get_miss();
        let snap = metrics.snapshot(0, 0, 0);
        assert_eq!(snap.get_calls, 3);
        assert_eq!(snap.get_hits, 2);
        assert_eq!(snap.get_misses, 1);
    }

    #[test]
    fn read_counters_work_through_shared_ref() {
        let metrics = LruMetrics::default();
        let shared = &metrics;
        shared.record_peek_call();
        shared.record_peek_found();
        shared.record_scan_call();
        let snap = metrics.snapshot(1, 2, 3);
        assert_eq!((snap.peek_calls, snap.peek_found, snap.scan_calls), (1, 1, 1));
        assert_eq!((snap.cache_len, snap.cache_size, snap.max_size), (1, 2, 3));
    }
}
