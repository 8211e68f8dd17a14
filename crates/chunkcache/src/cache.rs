//! ChunkCache: LRU cache front with statistics and a release hook

use std::fmt;

use coordmap::{Coord, Result};

use crate::lru::{Displaced, LruCache};
use crate::stats::CacheStats;

/// Callback receiving values the cache discards on its own
type EvictionHook<V> = Box<dyn FnMut(Coord, V)>;

/// Chunk cache combining the LRU with hit/miss tracking
///
/// Values the cache lets go of (evicted, overwritten, cleared, or still
/// cached on drop) are passed to the eviction hook when one is installed,
/// so resource-owning values can be released explicitly.
pub struct ChunkCache<V> {
    /// LRU cache for hot chunks
    lru: LruCache<V>,

    /// Cache statistics
    stats: CacheStats,

    /// Release hook for discarded values
    on_evict: Option<EvictionHook<V>>,
}

impl<V> ChunkCache<V> {
    /// Create a new ChunkCache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of chunks in cache (at least 2)
    ///
    /// # Returns
    /// * `Result<ChunkCache<V>>` - Empty cache
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            lru: LruCache::new(capacity)?,
            stats: CacheStats::new(),
            on_evict: None,
        })
    }

    /// Install the hook called with every value the cache discards
    pub fn with_eviction_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(Coord, V) + 'static,
    {
        self.on_evict = Some(Box::new(hook));
        self
    }

    /// Get a chunk, marking it most recently used
    ///
    /// # Returns
    /// * `Option<&V>` - Cached value, `None` on a miss
    pub fn get(&mut self, coord: impl Into<Coord>) -> Option<&V> {
        let value = self.lru.get(coord);
        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        value
    }

    /// Put a chunk into the cache, evicting the least recently used on overflow
    pub fn put(&mut self, coord: impl Into<Coord>, value: V) {
        let coord = coord.into();
        self.stats.record_insert();

        match self.lru.put(coord, value) {
            Some(Displaced::Evicted(evicted, old)) => {
                self.stats.record_eviction();
                self.release(evicted, old);
            }
            Some(Displaced::Replaced(old)) => self.release(coord, old),
            None => {}
        }
    }

    /// Get a chunk, loading and caching it on a miss
    ///
    /// # Arguments
    /// * `coord` - Chunk coordinate
    /// * `load` - Produces the value when `coord` is not cached
    pub fn get_or_insert_with<F>(&mut self, coord: impl Into<Coord>, load: F) -> &V
    where
        F: FnOnce(Coord) -> V,
    {
        let coord = coord.into();

        if self.lru.contains(coord) {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
            let value = load(coord);
            self.put(coord, value);
        }

        match self.lru.get(coord) {
            Some(value) => value,
            None => unreachable!("{} is cached after insert", coord),
        }
    }

    /// Get a chunk without touching recency or statistics
    pub fn peek(&self, coord: impl Into<Coord>) -> Option<&V> {
        self.lru.peek(coord)
    }

    /// Check whether a chunk is cached
    pub fn contains(&self, coord: impl Into<Coord>) -> bool {
        self.lru.contains(coord)
    }

    /// Take a chunk out of the cache
    ///
    /// The value is returned to the caller and does not reach the hook.
    pub fn remove(&mut self, coord: impl Into<Coord>) -> Option<V> {
        self.lru.remove(coord)
    }

    /// Iterate cached chunks from most to least recently used
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &V)> + '_ {
        self.lru.iter()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.lru.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.lru.is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.lru.capacity()
    }

    /// Release every cached chunk and reset statistics
    pub fn clear(&mut self) {
        self.release_all();
        self.stats.reset();
    }

    fn release(&mut self, coord: Coord, value: V) {
        if let Some(hook) = self.on_evict.as_mut() {
            hook(coord, value);
        }
    }

    fn release_all(&mut self) {
        for (coord, value) in self.lru.drain() {
            self.release(coord, value);
        }
    }
}

impl<V> Drop for ChunkCache<V> {
    fn drop(&mut self) {
        if self.on_evict.is_some() {
            self.release_all();
        }
    }
}

impl<V> fmt::Debug for ChunkCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("stats", &self.stats)
            .field("has_eviction_hook", &self.on_evict.is_some())
            .finish()
    }
}
