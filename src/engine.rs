use crate::entry::CacheEntry;
use crate::list::{Iter, List, ListNode};
use bytes::Bytes;
use hashbrown::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::ptr::NonNull;

/// The effect a [`put`](LruEngine::put) had on the cache.
///
/// Distinguishing an in-place update from an eviction lets callers keep
/// exact eviction counts instead of inferring them from size deltas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// The key was new and there was spare capacity.
    Inserted,
    /// The key already existed; its value was replaced in place.
    Updated,
    /// The key was new, the cache was full, and the least recently used
    /// entry made room.
    Evicted {
        /// Key of the evicted entry.
        key: Bytes,
        /// Value of the evicted entry.
        value: Bytes,
    },
}

/// The single-threaded LRU core: hash index + recency list.
///
/// Every operation costs a constant number of index probes and list
/// splices. The index maps each key to its node in the recency list;
/// the node just before the tail sentinel is the eviction victim.
///
/// `LruEngine` is not synchronized; it upholds its invariants through
/// `&mut self`. Wrap it in [`ByteCache`](crate::ByteCache) (or your own
/// lock) for concurrent use.
///
/// # Example
///
/// ```
/// use bytecache::LruEngine;
/// use bytes::Bytes;
/// use std::num::NonZeroUsize;
///
/// let mut engine = LruEngine::new(NonZeroUsize::new(2).unwrap());
/// engine.put(Bytes::from_static(b"a"), Bytes::from_static(b"1"));
/// engine.put(Bytes::from_static(b"b"), Bytes::from_static(b"2"));
///
/// engine.get(b"a"); // "a" becomes most recently used
/// engine.put(Bytes::from_static(b"c"), Bytes::from_static(b"3"));
///
/// assert!(engine.get(b"b").is_none()); // "b" was evicted
/// assert!(engine.get(b"a").is_some());
/// ```
pub struct LruEngine {
    capacity: NonZeroUsize,
    list: List<CacheEntry>,
    map: HashMap<Bytes, NonNull<ListNode<CacheEntry>>>,
}

// SAFETY: the node pointers in `map` only ever point into `list`, which
// the engine owns; no pointer escapes the engine.
unsafe impl Send for LruEngine {}

// SAFETY: every mutation requires `&mut self`, so shared references
// cannot race on the list or the index.
unsafe impl Sync for LruEngine {}

impl LruEngine {
    /// Creates an empty engine holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> LruEngine {
        LruEngine {
            capacity,
            list: List::new(),
            map: HashMap::with_capacity(capacity.get()),
        }
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Current number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Looks up `key`, promoting it to most recently used on a hit.
    ///
    /// Returns a copy of the value taken at the moment of the lookup and
    /// refreshes the entry's timestamp and access counter. A miss has no
    /// effect.
    pub fn get(&mut self, key: &[u8]) -> Option<Bytes> {
        let node = *self.map.get(key)?;
        // SAFETY: nodes stored in the index are live until removed from it.
        unsafe {
            self.list.move_to_front(node);
            let entry = (*node.as_ptr()).value_mut();
            entry.touch();
            Some(entry.value.clone())
        }
    }

    /// Returns `true` if `key` is cached. Does not promote the entry.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.map.contains_key(key)
    }

    /// Inserts or updates `key`.
    ///
    /// An existing key is overwritten in place, touched and promoted; no
    /// eviction can occur. A new key is inserted at the front of the
    /// recency list; when the cache is full, the least recently used
    /// entry is evicted first, so the size never exceeds the capacity.
    pub fn put(&mut self, key: Bytes, value: Bytes) -> PutOutcome {
        if let Some(&node) = self.map.get(&key[..]) {
            // SAFETY: nodes stored in the index are live until removed.
            unsafe {
                self.list.move_to_front(node);
                let entry = (*node.as_ptr()).value_mut();
                entry.value = value;
                entry.touch();
            }
            return PutOutcome::Updated;
        }

        // Make room before inserting: the victim is whatever sits at the
        // back of the recency list.
        let evicted = if self.map.len() == self.capacity.get() {
            self.list.pop_back().map(|victim| {
                self.map.remove(&victim.key[..]);
                victim
            })
        } else {
            None
        };

        let node = self.list.push_front(CacheEntry::new(key.clone(), value));
        self.map.insert(key, node);
        debug_assert_eq!(self.map.len(), self.list.len());
        debug_assert!(self.map.len() <= self.capacity.get());

        match evicted {
            Some(victim) => PutOutcome::Evicted {
                key: victim.key,
                value: victim.value,
            },
            None => PutOutcome::Inserted,
        }
    }

    /// Removes `key`, returning its value if it was cached.
    pub fn remove(&mut self, key: &[u8]) -> Option<Bytes> {
        let node = self.map.remove(key)?;
        // SAFETY: the node was live in the index until this call and is
        // unlinked exactly once.
        let entry = unsafe { self.list.unlink(node) };
        debug_assert_eq!(self.map.len(), self.list.len());
        Some(entry.value)
    }

    /// Drops every entry. The capacity is unchanged; metrics belong to
    /// the façade and are untouched.
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    /// Iterates entries from most to least recently used.
    pub(crate) fn entries(&self) -> Iter<'_, CacheEntry> {
        self.list.iter()
    }
}

impl fmt::Debug for LruEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruEngine")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .finish()
    }
}
