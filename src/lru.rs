//! # Size-bounded LRU cache
//!
//! [`LruCore`] is the single-threaded structure; [`ConcurrentLruCache`] wraps
//! it in one `parking_lot::RwLock`.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                    ConcurrentLruCache<K, V, C, L>                    │
//!   │                  Arc<RwLock<LruCore<K, V, C, L>>>                    │
//!   └──────────────────────────────────┬───────────────────────────────────┘
//!                                      ▼
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         LruCore<K, V, C, L>                          │
//!   │                                                                      │
//!   │   index: FxHashMap<K, SlotId>                                        │
//!   │      ┌─────────┬────────┐                                            │
//!   │      │  key_a  │  id_1 ─┼──────┐                                     │
//!   │      │  key_b  │  id_2 ─┼──────┼───────────┐                         │
//!   │      └─────────┴────────┘      ▼           ▼                         │
//!   │   list: IntrusiveList<Entry>  head ─► [a, cost 3] ◄──► [b, cost 1]   │
//!   │                                (MRU)                     (LRU) tail  │
//!   │                                                                      │
//!   │   size = Σ entry.cost      max_size: isize                           │
//!   │   cost_fn: C               listener: L                               │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Method                  | Lock  | Description                                  |
//! |-------------------------|-------|----------------------------------------------|
//! | `put(k, v)`             | Write | Insert or update, move to MRU, evict if over |
//! | `get(&k)`               | Write | Lookup and move to MRU                       |
//! | `peek(&k)`              | Read  | Lookup without reordering                    |
//! | `least_recently_used()` | Read  | Back entry, no reordering                    |
//! | `all_keys()`            | Read  | Keys front to back (MRU first)               |
//! | `scan(f)`               | Read  | Visit front to back until `f` returns false  |
//! | `remove(&k)`            | Write | Remove one entry, listener fires             |
//! | `remove_if(p)`          | Write | One pass, remove keys matching `p`           |
//! | `remove_all()`          | Write | Listener per entry, structure replaced       |
//! | `size()` / `count()`    | Read  | Accumulated cost / live entries              |
//!
//! ## Size accounting
//!
//! Each entry's cost is computed once, when its value is stored, and kept in
//! the entry. Removal subtracts the stored figure, so `size` always equals
//! the sum over live entries. After every `put` the back entry is popped
//! while `size > max_size`. A negative `max_size` retains nothing: every
//! entry put is evicted before `put` returns. A `max_size` of zero keeps only
//! zero-cost entries. The running total is wider than `usize`, so a cost
//! near `usize::MAX` is evicted like any other oversized entry.
//!
//! ## Eviction listener
//!
//! The listener receives the key and value by move, exactly once per entry,
//! when the entry leaves for good: automatic eviction, `remove`, `remove_if`,
//! or `remove_all`. Replacing a value with `put` drops the old value without
//! calling it. In the concurrent wrapper the listener runs under the write
//! lock; calling back into the same cache from it deadlocks.
//!
//! ## Example
//!
//! ```
//! use lrukit::lru::LruCore;
//!
//! let mut cache: LruCore<u32, &str> = LruCore::new(2);
//! cache.put(1, "alpha");
//! cache.put(2, "beta");
//! assert_eq!(cache.get(&1), Some(&"alpha"));
//!
//! cache.put(3, "gamma");
//! assert!(!cache.contains(&2));
//! assert_eq!(cache.all_keys(), vec![3, 1]);
//! ```

use std::fmt;
use std::hash::Hash;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

#[cfg(feature = "concurrency")]
use crate::builder::LruCacheBuilder;
use crate::ds::{IntrusiveList, SlotId};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::{
    CoreMetricsRecorder, LruMetrics, LruMetricsReadRecorder, LruMetricsRecorder,
    LruMetricsSnapshot,
};
use crate::strategy::{CostFn, EvictionListener, NoopListener, UnitCost};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    cost: usize,
}

/// Single-threaded LRU cache bounded by the summed cost of its entries.
///
/// `C` prices entries (default [`UnitCost`], making `max_size` an entry
/// count) and `L` is told about every entry that leaves (default
/// [`NoopListener`]).
pub struct LruCore<K, V, C = UnitCost, L = NoopListener> {
    index: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    max_size: isize,
    // Wider than any single cost so the running sum cannot overflow.
    size: u128,
    cost_fn: C,
    listener: L,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache that holds at most `max_size` entries.
    ///
    /// ```
    /// use lrukit::lru::LruCore;
    ///
    /// let mut cache: LruCore<u32, u32> = LruCore::new(0);
    /// cache.put(1, 1);
    /// assert_eq!(cache.count(), 0);
    /// ```
    pub fn new(max_size: isize) -> Self {
        Self::with_policies(max_size, UnitCost, NoopListener)
    }
}

impl<K, V, C, L> LruCore<K, V, C, L>
where
    K: Eq + Hash + Clone,
    C: CostFn<K, V>,
    L: EvictionListener<K, V>,
{
    /// Creates a cache with a custom cost function and eviction listener.
    pub fn with_policies(max_size: isize, cost_fn: C, listener: L) -> Self {
        let hint = usize::try_from(max_size).unwrap_or(0).min(1024);
        Self {
            index: FxHashMap::with_capacity_and_hasher(hint, Default::default()),
            list: IntrusiveList::with_capacity(hint),
            max_size,
            size: 0,
            cost_fn,
            listener,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Inserts or updates `key`, marks it most recently used, then evicts
    /// from the back until the cache is within budget.
    ///
    /// Updating an existing key replaces its value and cost without calling
    /// the listener for the old value.
    pub fn put(&mut self, key: K, value: V) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        let cost = self.cost_fn.cost(&key, &value);
        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            if let Some(entry) = self.list.get_mut(id) {
                self.size -= entry.cost as u128;
                self.size += cost as u128;
                entry.value = value;
                entry.cost = cost;
            }
            self.list.move_to_front(id);
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_new();

            let id = self.list.push_front(Entry {
                key: key.clone(),
                value,
                cost,
            });
            self.index.insert(key, id);
            self.size += cost as u128;
        }

        self.evict_while_oversized();
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Removes `key`, handing it to the listener. Returns `false` if absent.
    pub fn remove(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let Some(id) = self.index.remove(key) else {
            return false;
        };
        let Some(entry) = self.list.remove(id) else {
            return false;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        self.size -= entry.cost as u128;
        self.listener.on_evict(entry.key, entry.value);
        true
    }

    /// Removes every entry whose key matches `predicate`, in one front to
    /// back pass. Survivors keep their relative order. Returns the number of
    /// entries removed.
    pub fn remove_if<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&K) -> bool,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_if_call();

        let mut removed = 0usize;
        let mut current = self.list.front_id();
        while let Some(id) = current {
            // Captured before `id` is unlinked.
            current = self.list.next_id(id);

            let matches = self
                .list
                .get(id)
                .is_some_and(|entry| predicate(&entry.key));
            if !matches {
                continue;
            }
            if let Some(entry) = self.list.remove(id) {
                self.index.remove(&entry.key);
                self.size -= entry.cost as u128;
                removed += 1;
                self.listener.on_evict(entry.key, entry.value);
            }
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_if_removed(removed as u64);

        debug!(removed, remaining = self.list.len(), "remove_if pass finished");
        removed
    }

    /// Hands every entry to the listener (front to back) and resets the
    /// cache to empty. The index and list are replaced, not drained in place.
    pub fn remove_all(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        let mut list = std::mem::take(&mut self.list);
        self.index = FxHashMap::default();
        self.size = 0;

        debug!(entries = list.len(), "removing all entries");
        while let Some(entry) = list.pop_front() {
            self.listener.on_evict(entry.key, entry.value);
        }
    }

    fn evict_while_oversized(&mut self) {
        if !self.over_budget() {
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        while self.over_budget() {
            let Some(entry) = self.list.pop_back() else {
                break;
            };
            self.index.remove(&entry.key);
            self.size -= entry.cost as u128;

            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();

            trace!(
                cost = entry.cost,
                size = self.size(),
                max_size = self.max_size,
                "evicting least recently used entry"
            );
            self.listener.on_evict(entry.key, entry.value);
        }
    }
}

impl<K, V, C, L> LruCore<K, V, C, L>
where
    K: Eq + Hash,
{
    /// Returns the value for `key` without touching recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        let id = *self.index.get(key)?;
        let value = self.list.get(id).map(|entry| &entry.value);

        #[cfg(feature = "metrics")]
        if value.is_some() {
            self.metrics.record_peek_found();
        }
        value
    }

    /// Returns `true` if `key` is resident. Does not touch recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the least recently used entry without touching recency order.
    pub fn least_recently_used(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Returns every key, most recently used first.
    pub fn all_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.list.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Visits entries front to back until `visitor` returns `false`.
    /// Recency order is not changed.
    pub fn scan<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_scan_call();

        for (key, value) in self.iter() {
            if !visitor(key, value) {
                break;
            }
        }
    }

    /// Verifies that the index and list agree entry for entry, that list
    /// links are consistent, and that `size` equals the summed entry costs.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_links()?;

        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys, list holds {} entries",
                self.index.len(),
                self.list.len()
            )));
        }

        let mut total = 0u128;
        for (position, (id, entry)) in self.list.iter_entries().enumerate() {
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "entry at recency position {} is not indexed under its own slot {:?}",
                    position, id
                )));
            }
            total += entry.cost as u128;
        }

        if total != self.size {
            return Err(InvariantError::new(format!(
                "size counter {} != summed entry cost {}",
                self.size, total
            )));
        }
        if self.over_budget() && !self.list.is_empty() {
            return Err(InvariantError::new(format!(
                "size {} exceeds max_size {} with {} entries resident",
                self.size,
                self.max_size,
                self.list.len()
            )));
        }
        Ok(())
    }
}

impl<K, V, C, L> LruCore<K, V, C, L> {
    /// Accumulated cost of all resident entries.
    ///
    /// Saturates at `usize::MAX`, which only an entry that is about to be
    /// evicted can reach.
    #[inline]
    pub fn size(&self) -> usize {
        usize::try_from(self.size).unwrap_or(usize::MAX)
    }

    /// Number of resident entries.
    #[inline]
    pub fn count(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub fn max_size(&self) -> isize {
        self.max_size
    }

    fn over_budget(&self) -> bool {
        u128::try_from(self.max_size).map_or(true, |max| self.size > max)
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.metrics.snapshot(self.list.len(), self.size(), self.max_size)
    }
}

impl<K, V, C, L> fmt::Debug for LruCore<K, V, C, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("count", &self.list.len())
            .field("size", &self.size())
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

impl<K, V, C, L> Extend<(K, V)> for LruCore<K, V, C, L>
where
    K: Eq + Hash + Clone,
    C: CostFn<K, V>,
    L: EvictionListener<K, V>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

/// Thread-safe LRU cache: one `parking_lot::RwLock` around an [`LruCore`].
///
/// Cloning yields another handle to the same cache. Operations that change
/// recency order (`get` included) take the write lock; pure reads share the
/// read lock. Values are returned by clone, or borrowed through the `*_with`
/// closures while the lock is held.
#[cfg(feature = "concurrency")]
pub struct ConcurrentLruCache<K, V, C = UnitCost, L = NoopListener> {
    inner: Arc<RwLock<LruCore<K, V, C, L>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V, C, L> Clone for ConcurrentLruCache<K, V, C, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, C, L> fmt::Debug for ConcurrentLruCache<K, V, C, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentLruCache")
            .field("count", &cache.count())
            .field("size", &cache.size())
            .field("max_size", &cache.max_size())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache that holds at most `max_size` entries.
    ///
    /// ```
    /// use lrukit::lru::ConcurrentLruCache;
    ///
    /// let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(100);
    /// assert_eq!(cache.max_size(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(max_size: isize) -> Self {
        Self::from_core(LruCore::new(max_size))
    }

    /// Starts a builder for a cache with a custom cost function or listener.
    pub fn builder(max_size: isize) -> LruCacheBuilder<K, V> {
        LruCacheBuilder::new(max_size)
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, C, L> ConcurrentLruCache<K, V, C, L>
where
    K: Eq + Hash + Clone,
    C: CostFn<K, V>,
    L: EvictionListener<K, V>,
{
    /// Creates a cache with a custom cost function and eviction listener.
    pub fn with_policies(max_size: isize, cost_fn: C, listener: L) -> Self {
        Self::from_core(LruCore::with_policies(max_size, cost_fn, listener))
    }

    /// Wraps an existing core.
    pub fn from_core(core: LruCore<K, V, C, L>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(core)),
        }
    }

    /// Inserts or updates `key`; may evict other entries.
    ///
    /// ```
    /// use lrukit::lru::ConcurrentLruCache;
    ///
    /// let cache = ConcurrentLruCache::new(5);
    /// cache.put("k", 1);
    /// cache.put("k", 2);
    /// assert_eq!(cache.get(&"k"), Some(2));
    /// assert_eq!(cache.count(), 1);
    /// ```
    pub fn put(&self, key: K, value: V) {
        self.inner.write().put(key, value);
    }

    /// Returns a clone of the value and marks it most recently used.
    ///
    /// Takes the write lock because it reorders the recency list.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.write().get(key).cloned()
    }

    /// Runs `f` on the value and marks it most recently used.
    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.inner.write().get(key).map(f)
    }

    pub fn remove(&self, key: &K) -> bool {
        self.inner.write().remove(key)
    }

    pub fn remove_if<P>(&self, predicate: P) -> usize
    where
        P: FnMut(&K) -> bool,
    {
        self.inner.write().remove_if(predicate)
    }

    pub fn remove_all(&self) {
        self.inner.write().remove_all();
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, C, L> ConcurrentLruCache<K, V, C, L>
where
    K: Eq + Hash,
{
    /// Returns a clone of the value without touching recency order.
    ///
    /// Only takes the read lock.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().peek(key).cloned()
    }

    /// Runs `f` on the value without touching recency order.
    pub fn peek_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        let cache = self.inner.read();
        cache.peek(key).map(f)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// Returns clones of the least recently used key and value.
    pub fn least_recently_used(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let cache = self.inner.read();
        cache
            .least_recently_used()
            .map(|(key, value)| (key.clone(), value.clone()))
    }

    /// Returns every key, most recently used first.
    pub fn all_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.inner.read().all_keys()
    }

    /// Visits entries front to back under the read lock until `visitor`
    /// returns `false`. The visitor must not call back into this cache.
    pub fn scan<F>(&self, visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.inner.read().scan(visitor);
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn count(&self) -> usize {
        self.inner.read().count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn max_size(&self) -> isize {
        self.inner.read().max_size()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.read().check_invariants()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}
