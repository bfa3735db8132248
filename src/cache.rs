//! Bounded, TTL-aware classification cache (§4.D).
//!
//! Entries are evicted either by least-recent-use once the cache is full, or
//! lazily on read once their TTL has elapsed. Reads and writes deep-copy the
//! stored [`ClassificationResult`] so callers can never observe mutations
//! made by another caller's copy.

use crate::classification::ClassificationResult;
use crate::tool::ToolsFingerprint;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

struct Entry {
    result: ClassificationResult,
    inserted_at: Instant,
}

/// Build the cache key from the query and the fingerprint of the tool set it
/// was classified against, so a changed tool set can never serve a stale
/// classification.
pub fn cache_key(query: &str, fingerprint: &ToolsFingerprint) -> String {
    format!("{}:{}", fingerprint.as_str(), query.trim())
}

/// Point-in-time snapshot of cache effectiveness (§4.D supplement).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
    pub hit_rate: f64,
}

pub struct ClassificationCache {
    entries: Mutex<LruCache<String, Entry>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ClassificationCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a cached classification, promoting it to most-recently-used.
    /// Expired entries are evicted on read and counted as a miss.
    pub fn get(&self, key: &str) -> Option<ClassificationResult> {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(key) {
            if entry.inserted_at.elapsed() > self.ttl {
                entries.pop(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            self.hits.fetch_add(1, Ordering::Relaxed);
            let mut result = entry.result.clone();
            result.cached = true;
            return Some(result);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Insert or overwrite a cache entry. The stored copy carries
    /// `cached = false`; it is stamped `true` again on the next `get`.
    pub fn set(&self, key: String, mut result: ClassificationResult) {
        result.cached = false;
        self.entries.lock().put(
            key,
            Entry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn delete(&self, key: &str) -> bool {
        self.entries.lock().pop(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn size(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: entries.len(),
            capacity: entries.cap().get(),
            hit_rate: self.hit_rate(),
        }
    }
}
