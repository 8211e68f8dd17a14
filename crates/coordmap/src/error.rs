//! Error types for coordmap and the caches built on it

use std::collections::TryReserveError;
use std::fmt;

/// Result type alias for coordmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for index and cache construction and insertion
#[derive(Debug)]
pub enum Error {
    /// Index created with zero slots
    ZeroCapacity,

    /// Cache capacity below the two-node minimum
    CapacityTooSmall(usize),

    /// Derived table size does not fit in `usize`
    CapacityOverflow(usize),

    /// Slot or node array could not be allocated
    Alloc(TryReserveError),

    /// Every slot is occupied (holds the table capacity)
    TableFull(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroCapacity => write!(f, "Capacity must be greater than 0"),
            Error::CapacityTooSmall(cap) => {
                write!(f, "Cache capacity too small: {} (min 2)", cap)
            }
            Error::CapacityOverflow(cap) => write!(f, "Capacity overflow: {}", cap),
            Error::Alloc(e) => write!(f, "Allocation failed: {}", e),
            Error::TableFull(cap) => write!(f, "Hash index full: {} slots occupied", cap),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Alloc(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Error::Alloc(err)
    }
}
