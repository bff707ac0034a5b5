//! Byte-bounded LRU response cache.
//!
//! Grounded on `service/lru.rs`'s `ConnectionLru` (the `lru` crate under
//! a `parking_lot` lock) but collapsed from a per-thread sharded store
//! to one global structure: the cache's defining invariant is a single
//! `current_bytes <= MAX_TOTAL_BYTES` across the whole process, which a
//! sharded cache can't give us for free.

use bytes::Bytes;
use lru::LruCache;
use parking_lot::Mutex;

/// Max total bytes held by the cache across all entries.
pub const MAX_TOTAL_BYTES: usize = 200 * 1024 * 1024;
/// Entries larger than this are never admitted.
pub const MAX_ENTRY_BYTES: usize = 10 * 1024 * 1024;
/// Default entry-count bound (secondary to the byte bound, §9).
pub const DEFAULT_CAPACITY: usize = 100;

struct Entry {
    bytes: Bytes,
}

struct Inner {
    store: LruCache<String, Entry>,
    current_bytes: usize,
    capacity: usize,
}

/// A shared, concurrency-safe LRU cache of full HTTP response bodies,
/// keyed by the absolute request URL.
pub struct Cache {
    inner: Mutex<Inner>,
}

impl Cache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` bounds entry count in addition to the (always
    /// enforced) byte bound — see spec §9, "capacity semantics".
    pub fn with_capacity(capacity: usize) -> Self {
        // The backing LruCache is unbounded; eviction is driven by our
        // own byte/count bookkeeping in `evict_to_fit`, not by a cap on
        // the map itself.
        Cache {
            inner: Mutex::new(Inner {
                store: LruCache::unbounded(),
                current_bytes: 0,
                capacity: capacity.max(1),
            }),
        }
    }

    /// Look up `key`. A hit promotes the entry to most-recently-used.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let mut inner = self.inner.lock();
        inner.store.get(key).map(|entry| entry.bytes.clone())
    }

    /// Insert or replace `key`. A no-op if `value` exceeds
    /// `MAX_ENTRY_BYTES`. Evicts least-recently-used entries until both
    /// the byte bound and the entry-count bound are satisfied.
    pub fn put(&self, key: String, value: Bytes) {
        if value.len() > MAX_ENTRY_BYTES {
            tracing::debug!(key = %key, size = value.len(), "cache put dropped: oversize entry");
            return;
        }

        let mut inner = self.inner.lock();

        if let Some(old) = inner.store.peek(&key) {
            inner.current_bytes -= old.bytes.len();
        }

        let size = value.len();
        inner.store.put(key, Entry { bytes: value });
        inner.current_bytes += size;

        inner.evict_to_fit();
    }

    /// Current total bytes held across all entries.
    pub fn current_bytes(&self) -> usize {
        self.inner.lock().current_bytes
    }

    /// Current entry count.
    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn evict_to_fit(&mut self) {
        while self.current_bytes > MAX_TOTAL_BYTES || self.store.len() > self.capacity {
            match self.store.pop_lru() {
                Some((_, entry)) => self.current_bytes -= entry.bytes.len(),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of(len: usize) -> Bytes {
        Bytes::from(vec![b'x'; len])
    }

    #[test]
    fn miss_returns_none() {
        let cache = Cache::new();
        assert!(cache.get("http://example.com/").is_none());
    }

    #[test]
    fn put_then_get_hits() {
        let cache = Cache::new();
        cache.put("http://example.com/".into(), Bytes::from_static(b"hello"));
        assert_eq!(cache.get("http://example.com/").unwrap(), Bytes::from_static(b"hello"));
    }

    #[test]
    fn byte_bound_enforced_after_every_put() {
        let cache = Cache::with_capacity(usize::MAX);
        // fill past the byte bound with several large-ish entries
        let chunk = MAX_TOTAL_BYTES / 4 + 1;
        for i in 0..6 {
            cache.put(format!("http://x/{i}"), bytes_of(chunk));
            assert!(cache.current_bytes() <= MAX_TOTAL_BYTES);
        }
    }

    #[test]
    fn lru_order_evicts_least_recently_used() {
        // put(k1), put(k2), get(k1), put(k3) where k3 forces one eviction -> k2 evicted
        let cache = Cache::with_capacity(usize::MAX);
        let half = MAX_TOTAL_BYTES / 2;
        cache.put("k1".into(), bytes_of(half));
        cache.put("k2".into(), bytes_of(half));
        assert!(cache.get("k1").is_some());
        // k3 forces eviction of exactly one entry to stay under the bound
        cache.put("k3".into(), bytes_of(half));
        assert!(cache.get("k1").is_some());
        assert!(cache.get("k2").is_none());
        assert!(cache.get("k3").is_some());
    }

    #[test]
    fn oversize_put_is_dropped() {
        let cache = Cache::new();
        cache.put("big".into(), bytes_of(MAX_ENTRY_BYTES + 1));
        assert!(cache.get("big").is_none());
        assert_eq!(cache.current_bytes(), 0);
    }

    #[test]
    fn replace_same_key_updates_size_bookkeeping() {
        let cache = Cache::new();
        cache.put("k".into(), bytes_of(100));
        assert_eq!(cache.current_bytes(), 100);
        cache.put("k".into(), bytes_of(50));
        assert_eq!(cache.current_bytes(), 50);
    }

    #[test]
    fn entry_count_bound_evicts_lru_when_configured() {
        let cache = Cache::with_capacity(2);
        cache.put("a".into(), bytes_of(1));
        cache.put("b".into(), bytes_of(1));
        cache.put("c".into(), bytes_of(1));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
    }
}
