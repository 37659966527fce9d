//! Recorder traits for cache counters.
//!
//! ```text
//!   CoreMetricsRecorder        get hit/miss, insert, evict, clear
//!          │
//!          ▼
//!   LruMetricsRecorder         remove, remove_if          (&mut self)
//!
//!   LruMetricsReadRecorder     peek, scan                 (&self, atomics)
//! ```

/// Common counters for any cache.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Counters for explicit removal paths.
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
    fn record_remove_if_call(&mut self);
    fn record_remove_if_removed(&mut self, removed: u64);
}

/// Counters for `&self` paths, which run under a shared lock and may race.
pub trait LruMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
    fn record_scan_call(&self);
}
