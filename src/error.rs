//! Error types for the lrukit library.
//!
//! The cache operations themselves are total; these errors only surface from
//! diagnostics and fallible construction.
//!
//! - [`InvariantError`]: returned by `check_invariants` when the recency
//!   list, key index, or size accounting disagree.
//! - [`ConfigError`]: returned by fallible constructors when a parameter is
//!   unusable (e.g. a sharded cache with zero shards).
//!
//! ```
//! # #[cfg(feature = "concurrency")]
//! # {
//! use lrukit::error::ConfigError;
//! use lrukit::sharded::ShardedLruCache;
//!
//! let cache: Result<ShardedLruCache<String, i32>, ConfigError> = ShardedLruCache::try_new(4, 100);
//! assert!(cache.is_ok());
//!
//! let bad = ShardedLruCache::<String, i32>::try_new(0, 100);
//! assert!(bad.is_err());
//! # }
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`LruCore::check_invariants`](crate::lru::LruCore::check_invariants)
/// and the list-level link check. Carries a human-readable description of
/// which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
