//! End-to-end cache behavior through the public façade.

use bytecache::{ByteCache, CacheConfig, CacheError};

fn cache(capacity: usize) -> ByteCache {
    ByteCache::new(CacheConfig::new(capacity).unwrap())
}

#[test]
fn test_basic_put_get_overwrite() {
    let cache = cache(100);
    cache.put("k1", "v1");
    assert_eq!(cache.get(b"k1").as_deref(), Some(&b"v1"[..]));
    assert!(cache.get(b"missing").is_none());

    cache.put("k1", "v2");
    assert_eq!(cache.get(b"k1").as_deref(), Some(&b"v2"[..]));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_eviction_order() {
    let cache = cache(3);
    cache.put("a", "1");
    cache.put("b", "2");
    cache.put("c", "3");
    cache.put("d", "4");

    assert!(cache.get(b"a").is_none());
    assert_eq!(cache.get(b"d").as_deref(), Some(&b"4"[..]));
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_get_refreshes_recency() {
    let cache = cache(3);
    cache.put("a", "1");
    cache.put("b", "2");
    cache.put("c", "3");
    cache.get(b"a");
    cache.put("d", "4");

    assert!(cache.get(b"b").is_none());
    assert_eq!(cache.get(b"a").as_deref(), Some(&b"1"[..]));
}

#[test]
fn test_metrics_counting() {
    let cache = cache(100);
    cache.put("k1", "v1");
    cache.put("k2", "v2");
    cache.get(b"k1");
    cache.get(b"k3");

    let metrics = cache.metrics();
    assert_eq!(metrics.total_operations, 4);
    assert_eq!(metrics.cache_hits, 1);
    assert_eq!(metrics.cache_misses, 1);
    assert!(metrics.hit_rate() > 0.0 && metrics.hit_rate() < 1.0);
}

#[test]
fn test_reset_metrics() {
    let cache = cache(100);
    cache.put("k", "v");
    cache.get(b"k");
    assert_eq!(cache.metrics().total_operations, 2);

    cache.reset_metrics();
    let metrics = cache.metrics();
    assert_eq!(metrics.total_operations, 0);
    assert_eq!(metrics.cache_hits, 0);
    assert_eq!(metrics.cache_misses, 0);
    assert_eq!(metrics.evictions, 0);

    // The cache contents are unaffected by a metrics reset.
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_clear_keeps_counters_running() {
    let cache = cache(100);
    cache.put("k", "v");
    cache.clear();
    assert!(cache.is_empty());
    // put + clear, both counted; clear never resets metrics.
    assert_eq!(cache.metrics().total_operations, 2);
}

#[test]
fn test_clear_is_idempotent() {
    let cache = cache(10);
    cache.put("a", "1");
    cache.put("b", "2");
    cache.clear();
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.len(), 0);
    cache.put("c", "3");
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_remove_twice_reports_absence() {
    let cache = cache(10);
    cache.put("a", "1");
    assert!(cache.remove(b"a"));
    assert!(!cache.remove(b"a"));
    assert!(cache.is_empty());
}

#[test]
fn test_zero_capacity_rejected() {
    assert!(matches!(
        CacheConfig::new(0),
        Err(CacheError::InvalidConfiguration)
    ));
}

#[test]
fn test_sliding_window_of_distinct_keys() {
    // Insert n > capacity distinct keys with no intervening reads: a key
    // survives iff it is among the last `capacity` inserted.
    let capacity = 4;
    let n = 64;
    let cache = cache(capacity);
    for i in 0..n {
        cache.put(format!("key_{i}"), format!("val_{i}"));
        assert!(cache.len() <= capacity);
    }
    for i in 0..n - capacity {
        assert!(cache.get(format!("key_{i}").as_bytes()).is_none());
    }
    for i in n - capacity..n {
        assert_eq!(
            cache.get(format!("key_{i}").as_bytes()).as_deref(),
            Some(format!("val_{i}").as_bytes())
        );
    }
}

#[test]
fn test_contains_does_not_promote_or_count() {
    let cache = cache(2);
    cache.put("a", "1");
    cache.put("b", "2");

    assert!(cache.contains(b"a"));
    assert_eq!(cache.metrics().total_operations, 2); // probes are free

    // "a" stayed least recent despite the probe.
    cache.put("c", "3");
    assert!(!cache.contains(b"a"));
    assert!(cache.contains(b"b"));
}

#[test]
fn test_get_returns_copy_of_value_at_lookup() {
    let cache = cache(10);
    cache.put("k", "before");
    let copy = cache.get(b"k").unwrap();
    cache.put("k", "after");
    // The copy is unaffected by the later overwrite.
    assert_eq!(&copy[..], b"before");
    assert_eq!(cache.get(b"k").as_deref(), Some(&b"after"[..]));
}

#[test]
fn test_binary_keys_and_values() {
    let cache = cache(10);
    let key = vec![0u8, 159, 146, 150, 255];
    let value = vec![1u8, 0, 2, 0, 3];
    cache.put(key.clone(), value.clone());
    assert_eq!(cache.get(&key).as_deref(), Some(&value[..]));
}
