//! Chunk coordinates and the FNV-1a hash used to place them
//!
//! Key layout hashed by [`Coord::fnv1a`]:
//! ```text
//! [4 bytes: x i32 little-endian]
//! [4 bytes: z i32 little-endian]
//! ```

use std::fmt;

/// FNV-1a 64-bit offset basis
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Integer chunk coordinate on the horizontal (x, z) plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    /// Chunk column along x
    pub x: i32,
    /// Chunk column along z
    pub z: i32,
}

impl Coord {
    /// Create a coordinate
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Raw key bytes fed to the hash
    pub fn to_bytes(self) -> [u8; 8] {
        let mut key = [0u8; 8];
        key[..4].copy_from_slice(&self.x.to_le_bytes());
        key[4..].copy_from_slice(&self.z.to_le_bytes());
        key
    }

    /// 64-bit FNV-1a hash of the key bytes
    pub fn fnv1a(self) -> u64 {
        fnv1a(&self.to_bytes())
    }

    /// Preferred slot for this coordinate in a table of `capacity` slots
    pub fn bucket(self, capacity: usize) -> usize {
        (self.fnv1a() % capacity as u64) as usize
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, z): (i32, i32)) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// 64-bit FNV-1a over a byte slice
///
/// <https://en.wikipedia.org/wiki/Fowler%E2%80%93Noll%E2%80%93Vo_hash_function>
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET_BASIS, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}
