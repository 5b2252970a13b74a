//! LRU cache of country code grids, keyed by lat/lon grid.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

use climatology_common::{GridKey, LatLonGrid};

use super::CountryCodeGrid;
use crate::types::CacheStats;

/// Default number of distinct grids kept.
pub const DEFAULT_MASK_CACHE_CAPACITY: usize = 8;

/// LRU cache for country code grids.
///
/// Grids are handed out as `Arc`s and never modified after insertion.
pub struct MaskCache {
    cache: LruCache<GridKey, Arc<CountryCodeGrid>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl MaskCache {
    /// Create a cache holding at most `capacity` grids (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up the mask for `grid`, recording a hit or a miss.
    ///
    /// An entry under the same key but for different coordinates (a hash
    /// collision) counts as a miss.
    pub fn get(&mut self, key: &GridKey, grid: &LatLonGrid) -> Option<Arc<CountryCodeGrid>> {
        match self.cache.get(key) {
            Some(mask) if mask.grid() == grid => {
                self.hits += 1;
                Some(Arc::clone(mask))
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Check if a key exists in the cache without updating LRU order.
    pub fn contains(&self, key: &GridKey) -> bool {
        self.cache.contains(key)
    }

    /// Insert a grid, evicting the least recently used one when full.
    pub fn insert(&mut self, key: GridKey, grid: Arc<CountryCodeGrid>) {
        if let Some((evicted_key, _)) = self.cache.push(key, grid) {
            if evicted_key != key {
                self.evictions += 1;
            }
        }
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.cache.len(),
            evictions: self.evictions,
        }
    }

    /// Clear all entries from the cache.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for MaskCache {
    fn default() -> Self {
        Self::new(DEFAULT_MASK_CACHE_CAPACITY)
    }
}
