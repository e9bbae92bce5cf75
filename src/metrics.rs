//! The counters are independent atomics updated with relaxed ordering and
//! are never read or written under the engine lock. A snapshot therefore
//! reflects recent but not necessarily instantaneous state, and no
//! ordering holds between individual counters or between them and the
//! engine.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lock-free traffic counters plus the throughput clock.
///
/// Owned by the façade; counters are monotonic until [`reset`](Self::reset).
#[derive(Debug)]
pub(crate) struct CacheMetrics {
    operations: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    /// When counting (re)started; drives `operations_per_second`.
    started: Mutex<Instant>,
}

impl CacheMetrics {
    pub(crate) fn new() -> Self {
        CacheMetrics {
            operations: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            started: Mutex::new(Instant::now()),
        }
    }

    #[inline]
    pub(crate) fn record_operation(&self) {
        self.operations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_operations: self.operations.load(Ordering::Relaxed),
            cache_hits: self.hits.load(Ordering::Relaxed),
            cache_misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            uptime: self.started.lock().elapsed(),
        }
    }

    /// Zeroes every counter and restarts the throughput clock.
    pub(crate) fn reset(&self) {
        self.operations.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        *self.started.lock() = Instant::now();
    }
}

/// A point-in-time copy of the façade's traffic counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Operations dispatched to the engine (`get`, `put`, `remove`,
    /// `clear`).
    pub total_operations: u64,
    /// Lookups that found their key.
    pub cache_hits: u64,
    /// Lookups that missed.
    pub cache_misses: u64,
    /// Entries evicted to make room for an insertion.
    pub evictions: u64,
    /// Time since construction or the last metrics reset.
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Hits over total lookups; `0.0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }

    /// Operations per second over [`uptime`](Self::uptime); `0.0` when no
    /// time has elapsed.
    pub fn operations_per_second(&self) -> f64 {
        let secs = self.uptime.as_secs_f64();
        if secs > 0.0 {
            self.total_operations as f64 / secs
        } else {
            0.0
        }
    }

    /// All counters and rates as a deterministically ordered map, for
    /// stable reporting and comparisons.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert(
            "operations_per_second".to_string(),
            self.operations_per_second(),
        );
        metrics.insert("total_operations".to_string(), self.total_operations as f64);
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = CacheMetrics::new();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_operations, 0);
        assert_eq!(snapshot.cache_hits, 0);
        assert_eq!(snapshot.cache_misses, 0);
        assert_eq!(snapshot.evictions, 0);
        assert_eq!(snapshot.hit_rate(), 0.0);
    }

    #[test]
    fn test_recording_and_rates() {
        let metrics = CacheMetrics::new();
        metrics.record_operation();
        metrics.record_operation();
        metrics.record_operation();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_miss();
        metrics.record_eviction();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_operations, 3);
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 2);
        assert_eq!(snapshot.evictions, 1);
        assert!((snapshot.hit_rate() - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_zeroes_and_restarts_clock() {
        let metrics = CacheMetrics::new();
        metrics.record_operation();
        metrics.record_hit();
        std::thread::sleep(Duration::from_millis(5));
        let before = metrics.snapshot();
        assert!(before.uptime >= Duration::from_millis(5));

        metrics.reset();
        let after = metrics.snapshot();
        assert_eq!(after.total_operations, 0);
        assert_eq!(after.cache_hits, 0);
        assert!(after.uptime < before.uptime);
    }

    #[test]
    fn test_ops_per_second_zero_without_elapsed_time() {
        let snapshot = MetricsSnapshot {
            total_operations: 10,
            cache_hits: 0,
            cache_misses: 0,
            evictions: 0,
            uptime: Duration::ZERO,
        };
        assert_eq!(snapshot.operations_per_second(), 0.0);
    }

    #[test]
    fn test_btreemap_report_is_complete() {
        let metrics = CacheMetrics::new();
        metrics.record_operation();
        metrics.record_hit();
        let report = metrics.snapshot().to_btreemap();
        let keys: Vec<&str> = report.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "cache_hits",
                "cache_misses",
                "evictions",
                "hit_rate",
                "operations_per_second",
                "total_operations",
            ]
        );
        assert_eq!(report["hit_rate"], 1.0);
    }
}
