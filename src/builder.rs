//! Builder for LRU caches with optional cost function and eviction listener.
//!
//! Unset strategies fall back to [`UnitCost`] (each entry costs 1) and
//! [`NoopListener`].
//!
//! ## Example
//!
//! ```rust
//! use lrukit::builder::LruCacheBuilder;
//!
//! let mut cache = LruCacheBuilder::<String, Vec<u8>>::new(1024)
//!     .cost_fn(|key, value| key.len() + value.len())
//!     .on_evict(|key, _value| println!("dropped {key}"))
//!     .build_core();
//!
//! cache.put("blob".to_string(), vec![0; 100]);
//! assert_eq!(cache.size(), 104);
//! ```

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::lru::LruCore;
#[cfg(feature = "concurrency")]
use crate::error::ConfigError;
#[cfg(feature = "concurrency")]
use crate::lru::ConcurrentLruCache;
#[cfg(feature = "concurrency")]
use crate::sharded::ShardedLruCache;
use crate::strategy::{CostFn, EvictionListener, NoopListener, UnitCost};

/// Collects a size budget and strategies, then builds any cache flavour.
pub struct LruCacheBuilder<K, V, C = UnitCost, L = NoopListener> {
    max_size: isize,
    cost_fn: C,
    listener: L,
    _types: PhantomData<fn(K, V)>,
}

impl<K, V> LruCacheBuilder<K, V> {
    /// Starts a builder with the given size budget.
    pub fn new(max_size: isize) -> Self {
        Self {
            max_size,
            cost_fn: UnitCost,
            listener: NoopListener,
            _types: PhantomData,
        }
    }
}

impl<K, V, C, L> LruCacheBuilder<K, V, C, L> {
    /// Sets the size budget.
    pub fn max_size(mut self, max_size: isize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Prices each entry with `cost_fn`. Must be pure: the same key and
    /// value always cost the same.
    pub fn cost_fn<F>(self, cost_fn: F) -> LruCacheBuilder<K, V, F, L>
    where
        F: Fn(&K, &V) -> usize,
    {
        self.cost_policy(cost_fn)
    }

    /// Uses any [`CostFn`] implementation, e.g. a named strategy type.
    pub fn cost_policy<F>(self, cost_fn: F) -> LruCacheBuilder<K, V, F, L>
    where
        F: CostFn<K, V>,
    {
        LruCacheBuilder {
            max_size: self.max_size,
            cost_fn,
            listener: self.listener,
            _types: PhantomData,
        }
    }

    /// Calls `listener` with each entry that leaves the cache for good.
    pub fn on_evict<F>(self, listener: F) -> LruCacheBuilder<K, V, C, F>
    where
        F: Fn(K, V),
    {
        self.eviction_listener(listener)
    }

    /// Uses any [`EvictionListener`] implementation.
    pub fn eviction_listener<F>(self, listener: F) -> LruCacheBuilder<K, V, C, F>
    where
        F: EvictionListener<K, V>,
    {
        LruCacheBuilder {
            max_size: self.max_size,
            cost_fn: self.cost_fn,
            listener,
            _types: PhantomData,
        }
    }
}

impl<K, V, C, L> LruCacheBuilder<K, V, C, L>
where
    K: Eq + Hash + Clone,
    C: CostFn<K, V>,
    L: EvictionListener<K, V>,
{
    /// Builds a single-threaded [`LruCore`].
    pub fn build_core(self) -> LruCore<K, V, C, L> {
        LruCore::with_policies(self.max_size, self.cost_fn, self.listener)
    }

    /// Builds a [`ConcurrentLruCache`] guarded by one read/write lock.
    #[cfg(feature = "concurrency")]
    pub fn build(self) -> ConcurrentLruCache<K, V, C, L> {
        ConcurrentLruCache::from_core(self.build_core())
    }

    /// Builds a [`ShardedLruCache`] splitting the budget over `shards` locks.
    ///
    /// # Panics
    ///
    /// Panics if `shards` is zero. Use
    /// [`try_build_sharded`](Self::try_build_sharded) to get an error instead.
    #[cfg(feature = "concurrency")]
    pub fn build_sharded(self, shards: usize) -> ShardedLruCache<K, V, C, L> {
        match self.try_build_sharded(shards) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Builds a [`ShardedLruCache`], rejecting an unusable shard count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `shards` is zero or does not fit in `isize`.
    #[cfg(feature = "concurrency")]
    pub fn try_build_sharded(
        self,
        shards: usize,
    ) -> Result<ShardedLruCache<K, V, C, L>, ConfigError> {
        ShardedLruCache::try_with_policies(shards, self.max_size, self.cost_fn, self.listener)
    }
}

impl<K, V, C, L> fmt::Debug for LruCacheBuilder<K, V, C, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheBuilder")
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn defaults_bound_by_entry_count() {
        let mut cache = LruCacheBuilder::<u32, &str>::new(2).build_core();
        cache.put(1, "a");
        cache.put(2, "bb");
        cache.put(3, "ccc");
        assert_eq!(cache.count(), 2);
        assert_eq!(cache.size(), 2);
    }

    #[test]
    fn cost_fn_and_listener_are_wired_through() {
        let evicted = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&evicted);
        let mut cache = LruCacheBuilder::<u32, String>::new(4)
            .cost_fn(|_, v| v.len())
            .on_evict(move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build_core();

        cache.put(1, "ab".into());
        cache.put(2, "cd".into());
        assert_eq!(cache.size(), 4);
        cache.put(3, "e".into());

        assert_eq!(evicted.load(Ordering::SeqCst), 1);
        assert!(!cache.contains(&1));
        assert_eq!(cache.size(), 3);
    }

    #[test]
    fn max_size_can_be_overridden() {
        let cache = LruCacheBuilder::<u8, u8>::new(1).max_size(-3).build_core();
        assert_eq!(cache.max_size(), -3);
    }

    #[test]
    fn named_strategies_are_accepted() {
        let cache = LruCacheBuilder::<u8, u8>::new(1)
            .cost_policy(UnitCost)
            .eviction_listener(NoopListener)
            .build_core();
        assert!(cache.is_empty());
    }

    #[cfg(feature = "concurrency")]
    #[test]
    fn concurrent_and_sharded_builds() {
        let cache = LruCacheBuilder::<u32, u32>::new(10).build();
        cache.put(1, 1);
        assert_eq!(cache.get(&1), Some(1));

        let sharded = LruCacheBuilder::<u32, u32>::new(10).build_sharded(2);
        assert_eq!(sharded.shard_count(), 2);

        let err = LruCacheBuilder::<u32, u32>::new(10)
            .try_build_sharded(0)
            .unwrap_err();
        assert!(err.message().contains("shard"));
    }
}
