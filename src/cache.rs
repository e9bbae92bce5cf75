//! # Locking
//!
//! A successful `get` must both return the value and splice the entry to
//! the front of the recency list, so `get` takes the engine lock in
//! exclusive mode along with the other mutators (`put`, `remove`,
//! `clear`, `load_snapshot`). Pure observers (`len`, `is_empty`,
//! `contains`, `save_snapshot`) take it in shared mode. Observable engine
//! behavior is linearizable with respect to this lock. The metrics
//! counters are updated outside it and are only eventually consistent
//! with engine state.

use crate::config::CacheConfig;
use crate::engine::{LruEngine, PutOutcome};
use crate::error::CacheError;
use crate::metrics::{CacheMetrics, MetricsSnapshot};
use crate::snapshot;
use bytes::Bytes;
use parking_lot::RwLock;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A bounded, thread-safe LRU cache over byte-string keys and values.
///
/// Share it across threads behind an `Arc`. All state lives behind a
/// single readers-writer lock; eviction always picks the globally least
/// recently used entry.
///
/// If the configuration names a snapshot path, the cache restores itself
/// from that file at construction and writes it back at teardown.
///
/// # Example
///
/// ```
/// use bytecache::{ByteCache, CacheConfig};
///
/// let cache = ByteCache::new(CacheConfig::new(2).unwrap());
/// cache.put("apple", "red");
/// cache.put("banana", "yellow");
///
/// cache.get(b"apple"); // "apple" becomes most recently used
/// cache.put("cherry", "dark"); // evicts "banana"
///
/// assert!(cache.get(b"banana").is_none());
/// assert_eq!(cache.len(), 2);
/// ```
pub struct ByteCache {
    engine: RwLock<LruEngine>,
    metrics: CacheMetrics,
    snapshot_path: Option<PathBuf>,
}

impl ByteCache {
    /// Creates a cache from a validated configuration.
    ///
    /// If the configuration names a snapshot path and a file exists
    /// there, the cache restores itself from it. A snapshot that cannot
    /// be read is logged and otherwise ignored; restoration failure is
    /// never fatal.
    pub fn new(config: CacheConfig) -> ByteCache {
        let CacheConfig {
            capacity,
            snapshot_path,
        } = config;
        let mut engine = LruEngine::new(capacity);

        if let Some(path) = snapshot_path.as_deref() {
            if path.exists() {
                match snapshot::read_from_path(&mut engine, path) {
                    Ok(restored) => {
                        info!(path = %path.display(), entries = restored, "restored cache snapshot");
                    }
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "failed to restore cache snapshot");
                    }
                }
            }
        }

        ByteCache {
            engine: RwLock::new(engine),
            metrics: CacheMetrics::new(),
            snapshot_path,
        }
    }

    /// Convenience constructor: capacity only, no snapshot persistence.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidConfiguration`] when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<ByteCache, CacheError> {
        Ok(ByteCache::new(CacheConfig::new(capacity)?))
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> NonZeroUsize {
        self.engine.read().capacity()
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.engine.read().len()
    }

    /// Returns `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.engine.read().is_empty()
    }

    /// Looks up `key`.
    ///
    /// A hit promotes the entry to most recently used, refreshes its
    /// bookkeeping and returns a copy of the value taken at the moment of
    /// the lookup.
    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        self.metrics.record_operation();
        let value = self.engine.write().get(key);
        if value.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        value
    }

    /// Membership probe. Does not promote the entry and does not count
    /// toward the traffic metrics.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.engine.read().contains(key)
    }

    /// Inserts or overwrites `key`.
    ///
    /// When the cache is full and `key` is new, the least recently used
    /// entry is evicted to make room; overwriting an existing key never
    /// evicts.
    pub fn put(&self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        self.metrics.record_operation();
        let outcome = self.engine.write().put(key.into(), value.into());
        if let PutOutcome::Evicted { key, .. } = outcome {
            self.metrics.record_eviction();
            debug!(key_len = key.len(), "evicted least recently used entry");
        }
    }

    /// Removes `key`. Returns whether it was present.
    pub fn remove(&self, key: &[u8]) -> bool {
        self.metrics.record_operation();
        self.engine.write().remove(key).is_some()
    }

    /// Drops every entry. The capacity is preserved and the metrics
    /// counters keep running; use [`reset_metrics`](Self::reset_metrics)
    /// to zero those.
    pub fn clear(&self) {
        self.metrics.record_operation();
        self.engine.write().clear();
    }

    /// Writes the current live set to the configured snapshot path.
    ///
    /// The engine lock is held in shared mode for the duration of the
    /// walk, so the stream reflects one consistent state while readers
    /// stay unblocked.
    ///
    /// # Errors
    ///
    /// [`CacheError::SnapshotPathNotConfigured`] when the cache was built
    /// without a snapshot path, [`CacheError::SnapshotIo`] when the sink
    /// cannot be opened or written.
    pub fn save_snapshot(&self) -> Result<(), CacheError> {
        let path = self
            .snapshot_path
            .as_deref()
            .ok_or(CacheError::SnapshotPathNotConfigured)?;
        let engine = self.engine.read();
        snapshot::write_to_path(&engine, path)?;
        debug!(path = %path.display(), entries = engine.len(), "saved cache snapshot");
        Ok(())
    }

    /// Replaces the cache contents with the configured snapshot file.
    ///
    /// Returns `true` on a clean restore. Returns `false` when no path is
    /// configured, the file is missing or unreadable (contents
    /// untouched), the version is unsupported (cache left empty), or the
    /// stream is truncated (the restored prefix is kept).
    pub fn load_snapshot(&self) -> bool {
        let Some(path) = self.snapshot_path.as_deref() else {
            return false;
        };
        let mut engine = self.engine.write();
        match snapshot::read_from_path(&mut engine, path) {
            Ok(restored) => {
                debug!(path = %path.display(), entries = restored, "loaded cache snapshot");
                true
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load cache snapshot");
                false
            }
        }
    }

    /// Reads the traffic counters. Never touches the engine lock.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Zeroes the traffic counters and restarts the throughput clock.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }
}

impl Drop for ByteCache {
    /// Best-effort snapshot at teardown when a path is configured; a
    /// failure is logged, never raised.
    fn drop(&mut self) {
        if self.snapshot_path.is_some() {
            if let Err(err) = self.save_snapshot() {
                warn!(error = %err, "failed to save cache snapshot at teardown");
            }
        }
    }
}

impl fmt::Debug for ByteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = self.engine.read();
        f.debug_struct("ByteCache")
            .field("capacity", &engine.capacity())
            .field("len", &engine.len())
            .field("snapshot_path", &self.snapshot_path)
            .finish()
    }
}
