//! Caller-supplied strategies: how much an entry costs, and what happens when
//! it leaves the cache.
//!
//! Both are traits with blanket impls for closures, so the common case is a
//! plain closure:
//!
//! ```
//! use lrukit::lru::LruCore;
//!
//! let mut cache: LruCore<u32, String, _, _> = LruCore::with_policies(
//!     10,
//!     |_key: &u32, value: &String| value.len(),
//!     |key: u32, value: String| println!("evicted {key} -> {value}"),
//! );
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.size(), 5);
//! ```
//!
//! Cost functions must be pure and fast. The cache records the cost of an
//! entry when the value is stored and subtracts that recorded figure on
//! removal. Listeners run while the cache is exclusively locked and must not
//! call back into the same cache.

use std::sync::Arc;

/// Weight of one entry against the cache's size budget.
pub trait CostFn<K, V> {
    fn cost(&self, key: &K, value: &V) -> usize;
}

/// Hook invoked exactly once when an entry is permanently removed.
///
/// The key and value are handed over by move; the cache keeps no alias.
pub trait EvictionListener<K, V> {
    fn on_evict(&self, key: K, value: V);
}

/// Every entry costs 1, turning the size budget into an entry count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitCost;

impl<K, V> CostFn<K, V> for UnitCost {
    #[inline]
    fn cost(&self, _key: &K, _value: &V) -> usize {
        1
    }
}

/// Listener that drops evicted entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopListener;

impl<K, V> EvictionListener<K, V> for NoopListener {
    #[inline]
    fn on_evict(&self, _key: K, _value: V) {}
}

impl<K, V, F> CostFn<K, V> for F
where
    F: Fn(&K, &V) -> usize,
{
    #[inline]
    fn cost(&self, key: &K, value: &V) -> usize {
        self(key, value)
    }
}

impl<K, V, F> EvictionListener<K, V> for F
where
    F: Fn(K, V),
{
    #[inline]
    fn on_evict(&self, key: K, value: V) {
        self(key, value)
    }
}

/// Strategy shared by several caches, e.g. the shards of a
/// [`ShardedLruCache`](crate::sharded::ShardedLruCache).
#[derive(Debug)]
pub struct Shared<P>(Arc<P>);

impl<P> Shared<P> {
    pub fn new(policy: P) -> Self {
        Self(Arc::new(policy))
    }
}

impl<P> Clone for Shared<P> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<K, V, P> CostFn<K, V> for Shared<P>
where
    P: CostFn<K, V>,
{
    #[inline]
    fn cost(&self, key: &K, value: &V) -> usize {
        self.0.cost(key, value)
    }
}

impl<K, V, P> EvictionListener<K, V> for Shared<P>
where
    P: EvictionListener<K, V>,
{
    #[inline]
    fn on_evict(&self, key: K, value: V) {
        self.0.on_evict(key, value)
    }
}
