#![forbid(unsafe_code)]

//! LRU cache for measured line widths.
//!
//! Layout passes re-measure the same string many times: once per frame while
//! animating, and up to two dozen times per auto-fit search. Widths are cached
//! per `(text, font family, font size)`.
//!
//! # Example
//! ```
//! use flip_style::Font;
//! use flip_text::AdvanceCache;
//!
//! let mut cache = AdvanceCache::new(64);
//! let font = Font::system(12.0);
//!
//! let width = cache.get_or_compute_with("Hello", &font, |_| 30.0);
//! assert_eq!(width, 30.0);
//!
//! // Second call hits the cache and never runs the closure.
//! let width = cache.get_or_compute_with("Hello", &font, |_| unreachable!());
//! assert_eq!(width, 30.0);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use flip_style::Font;
use lru::LruCache;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

/// Default cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
    /// Maximum capacity.
    pub capacity: usize,
}

impl CacheStats {
    /// Hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of line widths keyed by text and font.
///
/// Keys are 64-bit FxHash digests of `(text, family, size bits)` rather than
/// the strings themselves.
#[derive(Debug)]
pub struct AdvanceCache {
    cache: LruCache<u64, f32>,
    hits: u64,
    misses: u64,
}

impl AdvanceCache {
    /// Create a cache with the given capacity (zero is raised to one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(non_zero(capacity)),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached width, or compute and cache it.
    pub fn get_or_compute_with<F>(&mut self, text: &str, font: &Font, compute: F) -> f32
    where
        F: FnOnce(&str) -> f32,
    {
        let key = hash_key(text, font);

        if let Some(&width) = self.cache.get(&key) {
            self.hits += 1;
            return width;
        }

        self.misses += 1;
        let width = compute(text);
        self.cache.put(key, width);
        width
    }

    /// Check whether a width is cached.
    #[must_use]
    pub fn contains(&self, text: &str, font: &Font) -> bool {
        self.cache.contains(&hash_key(text, font))
    }

    /// Clear all entries (statistics are kept).
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
        }
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for AdvanceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[inline]
fn non_zero(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

#[inline]
fn hash_key(text: &str, font: &Font) -> u64 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    font.family().hash(&mut hasher);
    font.size().to_bits().hash(&mut hasher);
    hasher.finish()
}
