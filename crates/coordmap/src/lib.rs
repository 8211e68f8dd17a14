//! # coordmap
//!
//! Fixed-capacity hash index keyed by 2D chunk coordinates.
//!
//! ## Design
//! - Open addressing with linear probing
//! - 64-bit FNV-1a over the coordinate bytes
//! - Tombstone deletion, collapsed when the next slot is free
//! - Allocated once, never resized

#![warn(missing_docs)]

mod coord;
mod error;
mod index;

pub use coord::{fnv1a, Coord, FNV_OFFSET_BASIS, FNV_PRIME};
pub use error::{Error, Result};
pub use index::HashIndex;
