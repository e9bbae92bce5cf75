use bytes::Bytes;
use std::time::Instant;

/// A cached key/value pair with its access bookkeeping.
///
/// Entries live inside the recency list; an entry's lifetime is exactly
/// the lifetime of its list node. The key is immutable after creation,
/// the value is replaced wholesale when a `put` updates the key, and the
/// timestamp and counter are refreshed together by [`touch`](Self::touch)
/// on every successful lookup and every update of an existing key.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    /// The cached key. Immutable after creation.
    pub key: Bytes,
    /// The cached value.
    pub value: Bytes,
    /// Monotonic timestamp of the last touch.
    last_accessed: Instant,
    /// Number of touches; the insertion itself counts as the first.
    access_count: u64,
}

impl CacheEntry {
    pub(crate) fn new(key: Bytes, value: Bytes) -> Self {
        CacheEntry {
            key,
            value,
            last_accessed: Instant::now(),
            access_count: 1,
        }
    }

    /// Refreshes `last_accessed` and increments `access_count`.
    pub(crate) fn touch(&mut self) {
        self.last_accessed = Instant::now();
        self.access_count = self.access_count.saturating_add(1);
    }

    #[allow(dead_code)] // observability hook, exercised by tests
    pub(crate) fn last_accessed(&self) -> Instant {
        self.last_accessed
    }

    /// Number of times this entry was touched, insertion included.
    #[allow(dead_code)] // observability hook, exercised by tests
    pub(crate) fn access_count(&self) -> u64 {
        self.access_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &'static [u8], value: &'static [u8]) -> CacheEntry {
        CacheEntry::new(Bytes::from_static(key), Bytes::from_static(value))
    }

    #[test]
    fn test_new_entry_counts_insertion_as_first_access() {
        let entry = entry(b"key", b"value");
        assert_eq!(entry.key, Bytes::from_static(b"key"));
        assert_eq!(entry.value, Bytes::from_static(b"value"));
        assert_eq!(entry.access_count(), 1);
    }

    #[test]
    fn test_touch_increments_and_refreshes() {
        let mut entry = entry(b"key", b"value");
        let before = entry.last_accessed();
        entry.touch();
        entry.touch();
        assert_eq!(entry.access_count(), 3);
        assert!(entry.last_accessed() >= before);
    }

    #[test]
    fn test_access_count_saturates() {
        let mut entry = entry(b"key", b"value");
        entry.access_count = u64::MAX;
        entry.touch();
        assert_eq!(entry.access_count(), u64::MAX);
    }
}
