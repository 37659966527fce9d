//! Sharded LRU cache: N independently locked [`LruCore`]s.
//!
//! Keys are routed by [`ShardSelector`]. Each shard evicts by its own
//! recency order, so the cache as a whole is only approximately LRU: the
//! entry evicted is the least recently used *in its shard*. In exchange,
//! operations on keys in different shards do not contend.
//!
//! ```text
//!   put(k, v) ──► shard_for_key(k) ──► shards[i].write().put(k, v)
//!
//!   max_size = 102, shards = 4
//!   ┌──────────────┬──────────────┬──────────────┬──────────────┐
//!   │ RwLock<Core> │ RwLock<Core> │ RwLock<Core> │ RwLock<Core> │
//!   │ max = 26     │ max = 26     │ max = 25     │ max = 25     │
//!   └──────────────┴──────────────┴──────────────┴──────────────┘
//!      max_size % shards extra units go one each to the first shards
//! ```
//!
//! A positive budget smaller than the requested shard count would leave
//! shards with a budget of zero, so the shard count is lowered to
//! `max_size` and every shard keeps at least one unit.
//!
//! Cross-shard reads (`size`, `count`, `all_keys`, `scan`) lock one shard at
//! a time, so they are not a single atomic snapshot under concurrent writes.
//! There is no cache-wide `least_recently_used`.

use std::fmt;
use std::hash::Hash;

use parking_lot::RwLock;
use tracing::debug;

use crate::ds::ShardSelector;
use crate::error::{ConfigError, InvariantError};
use crate::lru::LruCore;
#[cfg(feature = "metrics")]
use crate::metrics::LruMetricsSnapshot;
use crate::strategy::{CostFn, EvictionListener, NoopListener, Shared, UnitCost};

const SHARD_SEED: u64 = 0x5eed;

type Shard<K, V, C, L> = RwLock<LruCore<K, V, Shared<C>, Shared<L>>>;

/// LRU cache split over independently locked shards.
pub struct ShardedLruCache<K, V, C = UnitCost, L = NoopListener> {
    shards: Box<[Shard<K, V, C, L>]>,
    selector: ShardSelector,
    max_size: isize,
}

impl<K, V> ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a sharded cache holding at most `max_size` entries overall.
    ///
    /// # Panics
    ///
    /// Panics if `shards` is zero.
    pub fn new(shards: usize, max_size: isize) -> Self {
        match Self::try_new(shards, max_size) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a sharded cache, returning an error for an unusable shard count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `shards` is zero or does not fit in `isize`.
    pub fn try_new(shards: usize, max_size: isize) -> Result<Self, ConfigError> {
        Self::try_with_policies(shards, max_size, UnitCost, NoopListener)
    }
}

impl<K, V, C, L> ShardedLruCache<K, V, C, L>
where
    K: Eq + Hash + Clone,
    C: CostFn<K, V>,
    L: EvictionListener<K, V>,
{
    /// Creates a sharded cache whose shards share one cost function and one
    /// eviction listener.
    ///
    /// With `0 < max_size < shards`, only `max_size` shards are created.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `shards` is zero or does not fit in `isize`.
    pub fn try_with_policies(
        shards: usize,
        max_size: isize,
        cost_fn: C,
        listener: L,
    ) -> Result<Self, ConfigError> {
        if shards == 0 {
            return Err(ConfigError::new("shard count must be greater than zero"));
        }
        let requested = shards;
        let divisor = isize::try_from(shards).map_err(|_| {
            ConfigError::new(format!("shard count {} does not fit in isize", shards))
        })?;

        let divisor = if max_size > 0 { divisor.min(max_size) } else { divisor };

        let per_shard = max_size / divisor;
        let remainder = max_size % divisor;
        let cost_fn = Shared::new(cost_fn);
        let listener = Shared::new(listener);

        let shards: Box<[_]> = (0..divisor)
            .map(|i| {
                let extra = if i < remainder.abs() { remainder.signum() } else { 0 };
                RwLock::new(LruCore::with_policies(
                    per_shard + extra,
                    cost_fn.clone(),
                    listener.clone(),
                ))
            })
            .collect();

        if shards.len() < requested {
            debug!(requested, shards = shards.len(), max_size, "shard count lowered to budget");
        }
        debug!(shards = shards.len(), max_size, per_shard, "created sharded LRU cache");
        Ok(Self {
            selector: ShardSelector::new(shards.len(), SHARD_SEED),
            shards,
            max_size,
        })
    }

    pub fn put(&self, key: K, value: V) {
        self.shard(&key).write().put(key, value);
    }

    /// Returns a clone of the value and marks it most recently used in its shard.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).write().get(key).cloned()
    }

    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.shard(key).write().get(key).map(f)
    }

    pub fn remove(&self, key: &K) -> bool {
        self.shard(key).write().remove(key)
    }

    /// Runs [`LruCore::remove_if`] on every shard in turn.
    pub fn remove_if<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&K) -> bool,
    {
        self.shards
            .iter()
            .map(|shard| shard.write().remove_if(&mut predicate))
            .sum()
    }

    pub fn remove_all(&self) {
        for shard in self.shards.iter() {
            shard.write().remove_all();
        }
    }
}

impl<K, V, C, L> ShardedLruCache<K, V, C, L>
where
    K: Eq + Hash,
{
    fn shard(&self, key: &K) -> &Shard<K, V, C, L> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).read().peek(key).cloned()
    }

    pub fn peek_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        let shard = self.shard(key).read();
        shard.peek(key).map(f)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.shard(key).read().contains(key)
    }

    /// Keys shard by shard, each shard most recently used first.
    pub fn all_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut keys = Vec::new();
        for shard in self.shards.iter() {
            keys.extend(shard.read().all_keys());
        }
        keys
    }

    /// Visits shards in index order, each front to back, until `visitor`
    /// returns `false`.
    pub fn scan<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut keep_going = true;
        for shard in self.shards.iter() {
            shard.read().scan(|key, value| {
                keep_going = visitor(key, value);
                keep_going
            });
            if !keep_going {
                break;
            }
        }
    }

    pub fn size(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().size()).sum()
    }

    pub fn count(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }

    /// Total budget across shards.
    pub fn max_size(&self) -> isize {
        self.max_size
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        for (i, shard) in self.shards.iter().enumerate() {
            shard
                .read()
                .check_invariants()
                .map_err(|e| InvariantError::new(format!("shard {}: {}", i, e)))?;
        }
        Ok(())
    }

    /// Counters summed over all shards.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        let mut total = LruMetricsSnapshot::default();
        for shard in self.shards.iter() {
            total.merge(&shard.read().metrics_snapshot());
        }
        total
    }
}

impl<K, V, C, L> fmt::Debug for ShardedLruCache<K, V, C, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedLruCache")
            .field("shards", &self.shards.len())
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}
