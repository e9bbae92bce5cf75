#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          ByteCache                               │
//! │                                                                  │
//! │   metrics (atomics, no lock)      RwLock<LruEngine>              │
//! │  ┌───────────────────────┐       ┌───────────────────────────┐   │
//! │  │ operations  hits      │       │  HashMap<Bytes, node>     │   │
//! │  │ misses      evictions │       │  MRU ◀──▶ ... ◀──▶ LRU    │   │
//! │  └───────────────────────┘       └───────────────────────────┘   │
//! │                                             │                    │
//! │                                       snapshot codec             │
//! │                                   (versioned LE stream)          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: the thread-safe façade, [`ByteCache`]
//! - [`engine`]: the single-threaded LRU core, [`LruEngine`]
//! - [`snapshot`]: the binary snapshot codec
//! - [`config`]: validated construction parameters
//! - [`metrics`]: the façade's counter snapshot
//! - [`error`]: the public error taxonomy

/// Thread-safe cache façade.
///
/// Wraps the engine in the crate's single readers-writer lock, maintains
/// the traffic counters, and owns the snapshot lifecycle (restore at
/// construction, best-effort save on drop).
pub mod cache;

/// Cache configuration.
///
/// Capacity and optional snapshot path, validated at construction time.
pub mod config;

/// Cache engine.
///
/// The single-threaded LRU core composing the hash index and the recency
/// list. Use [`ByteCache`] unless you are providing your own
/// synchronization.
pub mod engine;

/// Public error taxonomy.
pub mod error;

/// Façade metrics.
///
/// Monotonic, lock-free traffic counters and their point-in-time
/// snapshot.
pub mod metrics;

/// Snapshot codec.
///
/// Serializes the live entry set to a versioned little-endian stream and
/// restores it into an engine.
pub mod snapshot;

/// Cache entry bookkeeping.
///
/// Internal: entries are owned by the recency list and never handed out.
pub(crate) mod entry;

/// Recency list.
///
/// Internal infrastructure: a sentinel-anchored doubly linked list with
/// O(1) splice-to-front and tail-pop, operating on raw node pointers.
/// Use the engine or the façade instead.
pub(crate) mod list;

pub use cache::ByteCache;
pub use config::CacheConfig;
pub use engine::{LruEngine, PutOutcome};
pub use error::CacheError;
pub use metrics::MetricsSnapshot;
pub use snapshot::SnapshotError;

// The value/key handle type, re-exported so callers don't need a direct
// `bytes` dependency for the common paths.
pub use bytes::Bytes;
