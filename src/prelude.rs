pub use crate::builder::LruCacheBuilder;
pub use crate::ds::{IntrusiveList, ShardSelector, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::lru::LruCore;
pub use crate::strategy::{CostFn, EvictionListener, NoopListener, Shared, UnitCost};

#[cfg(feature = "concurrency")]
pub use crate::lru::ConcurrentLruCache;
#[cfg(feature = "concurrency")]
pub use crate::sharded::ShardedLruCache;
#[cfg(feature = "metrics")]
pub use crate::metrics::LruMetricsSnapshot;
