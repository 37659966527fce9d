//! lrukit: a size-bounded LRU cache with pluggable cost and eviction hooks.
//!
//! - [`lru::LruCore`]: single-threaded cache, `&mut self` for mutations.
//! - [`lru::ConcurrentLruCache`]: one `RwLock` around a core (feature `concurrency`).
//! - [`sharded::ShardedLruCache`]: independently locked shards (feature `concurrency`).
//! - [`builder::LruCacheBuilder`]: assembles any of the above with a cost
//!   function and eviction listener.
//!
//! Capacity is a budget on the summed cost of resident entries. With the
//! default [`strategy::UnitCost`] every entry costs one, so the budget is an
//! entry count.

pub mod builder;
pub mod ds;
pub mod error;
pub mod lru;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod prelude;
#[cfg(feature = "concurrency")]
pub mod sharded;
pub mod strategy;
