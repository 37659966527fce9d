//! Optional operation counters, compiled in with the `metrics` feature.
//!
//! Recording is split from reading: the cache core owns an [`LruMetrics`]
//! recorder and hands out [`LruMetricsSnapshot`] copies.

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::LruMetrics;
pub use snapshot::LruMetricsSnapshot;
pub use traits::{CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder};
