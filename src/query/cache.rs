use crate::query::NameLookup;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

type CacheKey = (String, usize);

/// Memoizes another [`NameLookup`] keyed by `(prefix, max)`.
///
/// Only sound over a backend whose answers do not change, such as a
/// loaded filter.
pub struct CachedLookup<L> {
    inner: L,
    cache: Mutex<LruCache<CacheKey, Vec<String>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<L: NameLookup> CachedLookup<L> {
    /// A capacity of zero is treated as one
    pub fn new(inner: L, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    fn cache(&self) -> MutexGuard<'_, LruCache<CacheKey, Vec<String>>> {
        // Entries are only ever inserted whole, so a poisoned cache is still consistent
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<L: NameLookup> NameLookup for CachedLookup<L> {
    fn lookup_tokens(&self, prefix: &str, max: usize) -> Vec<String> {
        let key = (prefix.to_string(), max);
        if let Some(tokens) = self.cache().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return tokens.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        // Computed without holding the lock
        let tokens = self.inner.lookup_tokens(prefix, max);
        self.cache().put(key, tokens.clone());
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MIN_PREFIX_LENGTH;
    use crate::query::SortedNameLookup;

    #[test]
    fn test_cache_hits() {
        let exact = SortedNameLookup::new(["smith", "smithson", "smyth"], MIN_PREFIX_LENGTH).unwrap();
        let cached = CachedLookup::new(exact, 2);

        let first = cached.lookup_tokens("smit", 10);
        let second = cached.lookup_tokens("smit", 10);
        assert_eq!(first, second);
        assert_eq!(first, cached.inner().lookup_tokens("smit", 10));
        assert_eq!((cached.hits(), cached.misses()), (1, 1));

        // Different budget is a different entry
        cached.lookup_tokens("smit", 1);
        assert_eq!(cached.misses(), 2);
        assert!((cached.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_eviction() {
        let exact = SortedNameLookup::new(["smith", "smyth"], MIN_PREFIX_LENGTH).unwrap();
        let cached = CachedLookup::new(exact, 1);

        cached.lookup_tokens("smit", 5);
        cached.lookup_tokens("smyt", 5);
        cached.lookup_tokens("smit", 5);
        assert_eq!(cached.hits(), 0);
        assert_eq!(cached.misses(), 3);
    }
}
