//! Open-addressing hash index keyed by chunk coordinates
//!
//! Layout:
//! - Fixed slot array sized once at creation, never resized
//! - Linear probing from `fnv1a(coord) % capacity`, wrapping at the end
//! - Deletion leaves a tombstone unless the next slot is free

use std::mem;

use tracing::debug;

use crate::coord::Coord;
use crate::error::{Error, Result};

/// State of a single slot
#[derive(Debug)]
enum Slot<V> {
    /// Never used, or collapsed after a removal. Terminates probing.
    Free,
    /// Removed entry. Probing continues past it.
    Tombstone,
    /// Live entry
    Occupied { coord: Coord, value: V },
}

/// Fixed-capacity coordinate -> value map
pub struct HashIndex<V> {
    /// Slot array, length == capacity
    slots: Box<[Slot<V>]>,

    /// Number of occupied slots
    len: usize,
}

impl<V> HashIndex<V> {
    /// Create an index with `capacity` free slots
    ///
    /// # Returns
    /// * `Err(Error::ZeroCapacity)` - `capacity` is 0
    /// * `Err(Error::Alloc)` - slot array could not be allocated
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.resize_with(capacity, || Slot::Free);

        debug!(capacity, "created coordinate hash index");

        Ok(Self {
            slots: slots.into_boxed_slice(),
            len: 0,
        })
    }

    /// Insert or overwrite the value stored under `coord`
    ///
    /// # Returns
    /// * `Ok(Some(old))` - `coord` was present, its value was replaced
    /// * `Ok(None)` - `coord` was added
    /// * `Err(Error::TableFull)` - every slot is occupied
    pub fn insert(&mut self, coord: Coord, value: V) -> Result<Option<V>> {
        let capacity = self.capacity();
        if self.len == capacity {
            return Err(Error::TableFull(capacity));
        }

        let start = coord.bucket(capacity);
        let mut first_tombstone = None;
        let mut index = start;

        // A duplicate may sit past a tombstone, so only a free slot ends the scan early
        let target = loop {
            match &mut self.slots[index] {
                Slot::Occupied { coord: existing, value: slot_value } if *existing == coord => {
                    return Ok(Some(mem::replace(slot_value, value)));
                }
                Slot::Occupied { .. } => {}
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Free => break first_tombstone.unwrap_or(index),
            }

            index = (index + 1) % capacity;
            if index == start {
                // No free slot anywhere, so len < capacity implies a tombstone was seen
                match first_tombstone {
                    Some(tombstone) => break tombstone,
                    None => return Err(Error::TableFull(capacity)),
                }
            }
        };

        self.slots[target] = Slot::Occupied { coord, value };
        self.len += 1;

        Ok(None)
    }

    /// Remove `coord`, returning its value
    pub fn remove(&mut self, coord: Coord) -> Option<V> {
        let index = self.find(coord)?;
        let next = (index + 1) % self.capacity();

        let vacated = match self.slots[next] {
            Slot::Free => Slot::Free,
            _ => Slot::Tombstone,
        };

        self.len -= 1;
        match mem::replace(&mut self.slots[index], vacated) {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Get the value stored under `coord`
    pub fn get(&self, coord: Coord) -> Option<&V> {
        match &self.slots[self.find(coord)?] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Check whether `coord` is present
    pub fn contains_key(&self, coord: Coord) -> bool {
        self.find(coord).is_some()
    }

    /// Get the number of occupied slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the fixed slot count
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Get the number of tombstone slots
    pub fn tombstones(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Tombstone))
            .count()
    }

    /// Reset every slot to free
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Free;
        }
        self.len = 0;
    }

    /// Slot index holding `coord`, probing at most one full cycle
    fn find(&self, coord: Coord) -> Option<usize> {
        let capacity = self.capacity();
        let start = coord.bucket(capacity);
        let mut index = start;

        loop {
            match &self.slots[index] {
                Slot::Occupied { coord: existing, .. } if *existing == coord => {
                    return Some(index);
                }
                Slot::Free => return None,
                _ => {}
            }

            index = (index + 1) % capacity;
            if index == start {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// First `n` coordinates along the x axis whose preferred slot is `bucket`
    fn in_bucket(capacity: usize, bucket: usize, n: usize) -> Vec<Coord> {
        (0..)
            .map(|x| Coord::new(x, 0))
            .filter(|c| c.bucket(capacity) == bucket)
            .take(n)
            .collect()
    }

    fn is_free<V>(index: &HashIndex<V>, slot: usize) -> bool {
        matches!(index.slots[slot], Slot::Free)
    }

    #[test]
    fn test_create() {
        let index: HashIndex<u32> = HashIndex::with_capacity(16).unwrap();

        assert_eq!(index.capacity(), 16);
        assert_eq!(index.len(), 0);
        assert!(index.is_empty());
        assert!((0..16).all(|slot| is_free(&index, slot)));
    }

    #[test]
    fn test_zero_capacity() {
        let result = HashIndex::<u32>::with_capacity(0);
        assert!(matches!(result, Err(Error::ZeroCapacity)));
    }

    #[test]
    fn test_insert_and_get() {
        let mut index = HashIndex::with_capacity(8).unwrap();

        assert_eq!(index.insert(Coord::new(0, 0), "origin").unwrap(), None);
        assert_eq!(index.insert(Coord::new(-3, 7), "far").unwrap(), None);

        assert_eq!(index.get(Coord::new(0, 0)), Some(&"origin"));
        assert_eq!(index.get(Coord::new(-3, 7)), Some(&"far"));
        assert_eq!(index.get(Coord::new(7, -3)), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_overwrite_keeps_count() {
        let mut index = HashIndex::with_capacity(8).unwrap();

        index.insert(Coord::new(1, 1), 10).unwrap();
        let old = index.insert(Coord::new(1, 1), 20).unwrap();

        assert_eq!(old, Some(10));
        assert_eq!(index.get(Coord::new(1, 1)), Some(&20));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_table_full() {
        let mut index = HashIndex::with_capacity(4).unwrap();

        for x in 0..4 {
            index.insert(Coord::new(x, 0), x).unwrap();
        }

        let result = index.insert(Coord::new(99, 0), 99);
        assert!(matches!(result, Err(Error::TableFull(4))));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_remove() {
        let mut index = HashIndex::with_capacity(8).unwrap();

        index.insert(Coord::new(2, 5), 'a').unwrap();

        assert_eq!(index.remove(Coord::new(2, 5)), Some('a'));
        assert_eq!(index.remove(Coord::new(2, 5)), None);
        assert_eq!(index.get(Coord::new(2, 5)), None);
        assert!(index.is_empty());
    }

    #[test]
    fn test_collision_probes_to_next_slot() {
        let mut index = HashIndex::with_capacity(8).unwrap();
        let bucket = Coord::new(0, 0).bucket(8);
        let coords = in_bucket(8, bucket, 2);

        index.insert(coords[0], 0).unwrap();
        index.insert(coords[1], 1).unwrap();

        assert!(matches!(index.slots[bucket], Slot::Occupied { coord, .. } if coord == coords[0]));
        assert!(matches!(index.slots[(bucket + 1) % 8], Slot::Occupied { coord, .. } if coord == coords[1]));
    }

    #[test]
    fn test_remove_first_keeps_chain() {
        let mut index = HashIndex::with_capacity(8).unwrap();
        let bucket = Coord::new(0, 0).bucket(8);
        let coords = in_bucket(8, bucket, 2);

        index.insert(coords[0], "first").unwrap();
        index.insert(coords[1], "second").unwrap();

        assert_eq!(index.remove(coords[0]), Some("first"));

        // Occupied successor forces a tombstone
        assert!(matches!(index.slots[bucket], Slot::Tombstone));
        assert_eq!(index.tombstones(), 1);
        assert_eq!(index.get(coords[1]), Some(&"second"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_remove_collapses_before_free_slot() {
        let mut index = HashIndex::with_capacity(8).unwrap();
        let bucket = Coord::new(0, 0).bucket(8);
        let coords = in_bucket(8, bucket, 2);

        index.insert(coords[0], 0).unwrap();
        index.insert(coords[1], 1).unwrap();

        index.remove(coords[1]).unwrap();
        assert!(is_free(&index, (bucket + 1) % 8));

        index.remove(coords[0]).unwrap();
        assert!(is_free(&index, bucket));
        assert_eq!(index.tombstones(), 0);
    }

    #[test]
    fn test_insert_reuses_first_tombstone() {
        let mut index = HashIndex::with_capacity(8).unwrap();
        let bucket = Coord::new(0, 0).bucket(8);
        let coords = in_bucket(8, bucket, 3);

        index.insert(coords[0], 0).unwrap();
        index.insert(coords[1], 1).unwrap();
        index.remove(coords[0]).unwrap();

        index.insert(coords[2], 2).unwrap();

        assert!(matches!(index.slots[bucket], Slot::Occupied { coord, .. } if coord == coords[2]));
        assert_eq!(index.tombstones(), 0);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_insert_past_tombstone_finds_duplicate() {
        let mut index = HashIndex::with_capacity(8).unwrap();
        let bucket = Coord::new(0, 0).bucket(8);
        let coords = in_bucket(8, bucket, 2);

        index.insert(coords[0], 0).unwrap();
        index.insert(coords[1], 1).unwrap();
        index.remove(coords[0]).unwrap();

        // Must overwrite in place rather than fill the tombstone
        assert_eq!(index.insert(coords[1], 11).unwrap(), Some(1));
        assert_eq!(index.len(), 1);
        assert_eq!(index.tombstones(), 1);
        assert_eq!(index.get(coords[1]), Some(&11));
    }

    #[test]
    fn test_probe_wraps_around() {
        let mut index = HashIndex::with_capacity(8).unwrap();
        let coords = in_bucket(8, 7, 2);

        index.insert(coords[0], 'a').unwrap();
        index.insert(coords[1], 'b').unwrap();

        assert!(matches!(index.slots[0], Slot::Occupied { coord, .. } if coord == coords[1]));
        assert_eq!(index.get(coords[1]), Some(&'b'));
    }

    #[test]
    fn test_probe_terminates_without_free_slots() {
        let mut index = HashIndex::with_capacity(4).unwrap();

        for x in 0..4 {
            index.insert(Coord::new(x, 0), x).unwrap();
        }
        index.remove(Coord::new(0, 0)).unwrap();

        assert!((0..4).all(|slot| !is_free(&index, slot)));
        assert_eq!(index.get(Coord::new(42, 42)), None);
        assert_eq!(index.remove(Coord::new(42, 42)), None);

        // Only the tombstone can take the new entry
        index.insert(Coord::new(42, 42), 42).unwrap();
        assert_eq!(index.get(Coord::new(42, 42)), Some(&42));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_churn_keeps_count() {
        let mut index = HashIndex::with_capacity(16).unwrap();

        for round in 0..50 {
            for x in 0..8 {
                index.insert(Coord::new(x, round), x).unwrap();
            }
            for x in 0..8 {
                assert_eq!(index.remove(Coord::new(x, round)), Some(x));
            }
        }

        assert!(index.is_empty());
        index.insert(Coord::new(0, 0), 0).unwrap();
        assert_eq!(index.get(Coord::new(0, 0)), Some(&0));
    }

    #[test]
    fn test_clear() {
        let mut index = HashIndex::with_capacity(8).unwrap();

        index.insert(Coord::new(1, 2), 1).unwrap();
        index.insert(Coord::new(3, 4), 2).unwrap();
        index.remove(Coord::new(1, 2));
        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.tombstones(), 0);
        assert!(!index.contains_key(Coord::new(3, 4)));
    }
}
