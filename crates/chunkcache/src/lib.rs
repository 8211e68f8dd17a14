//! # chunkcache
//!
//! Fixed-capacity LRU cache for chunk coordinates.
//!
//! ## Architecture
//! - **Index**: `coordmap::HashIndex` sized at twice the capacity (O(1) lookups)
//! - **LRU List**: Doubly-linked list over a node arena (O(1) eviction)
//! - **Free List**: Singly-linked list of never-used or removed nodes
//! - **Front**: `ChunkCache` adds hit/miss statistics and a release hook
//!
//! Values are never dropped behind the caller's back when a hook is set:
//! evicted, overwritten, and remaining values are all handed to it.

#![warn(missing_docs)]

mod cache;
mod lru;
mod stats;

pub use cache::ChunkCache;
pub use coordmap::{Coord, Error, Result};
pub use lru::{Displaced, Iter, LruCache};
pub use stats::CacheStats;
