//! LRU (Least Recently Used) cache keyed by chunk coordinates
//!
//! Nodes live in an arena allocated once at creation. The recency list and
//! the free list are linked through arena indices, so every operation is O(1)
//! apart from the bounded probe in the coordinate index.

use coordmap::{Coord, Error, HashIndex, Result};
use tracing::{debug, trace};

/// Node in the arena. Active nodes sit on the recency list, idle nodes on
/// the free list (linked through `next` only).
struct Node<V> {
    coord: Coord,
    value: Option<V>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A value that left the cache during [`LruCache::put`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Displaced<V> {
    /// Previous value stored under the same coordinate
    Replaced(V),
    /// Least recently used entry, recycled to make room
    Evicted(Coord, V),
}

/// LRU cache with fixed capacity
pub struct LruCache<V> {
    /// Coordinate -> arena index, sized at twice the node count
    index: HashIndex<usize>,
    nodes: Vec<Node<V>>,
    /// Most recently used
    head: Option<usize>,
    /// Least recently used, next eviction victim
    tail: Option<usize>,
    free_head: Option<usize>,
}

impl<V> LruCache<V> {
    /// Create a new LRU cache holding at most `capacity` entries
    ///
    /// # Returns
    /// * `Err(Error::CapacityTooSmall)` - `capacity` is below 2
    /// * `Err(Error::CapacityOverflow)` - the index size overflows
    /// * `Err(Error::Alloc)` - the arena or index could not be allocated
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < 2 {
            return Err(Error::CapacityTooSmall(capacity));
        }

        let slots = capacity
            .checked_mul(2)
            .ok_or(Error::CapacityOverflow(capacity))?;
        let index = HashIndex::with_capacity(slots)?;

        let mut nodes = Vec::new();
        nodes.try_reserve_exact(capacity)?;
        nodes.extend((0..capacity).map(|_| Node {
            coord: Coord::default(),
            value: None,
            prev: None,
            next: None,
        }));

        let mut cache = Self {
            index,
            nodes,
            head: None,
            tail: None,
            free_head: None,
        };
        cache.reset_free_list();

        debug!(capacity, index_slots = slots, "created LRU cache");

        Ok(cache)
    }

    /// Get a value and mark it most recently used
    pub fn get(&mut self, coord: impl Into<Coord>) -> Option<&V> {
        let idx = *self.index.get(coord.into())?;
        self.move_to_front(idx);
        self.nodes[idx].value.as_ref()
    }

    /// Get a mutable value and mark it most recently used
    pub fn get_mut(&mut self, coord: impl Into<Coord>) -> Option<&mut V> {
        let idx = *self.index.get(coord.into())?;
        self.move_to_front(idx);
        self.nodes[idx].value.as_mut()
    }

    /// Get a value without touching recency
    pub fn peek(&self, coord: impl Into<Coord>) -> Option<&V> {
        let idx = *self.index.get(coord.into())?;
        self.nodes[idx].value.as_ref()
    }

    /// Check whether `coord` is cached, without touching recency
    pub fn contains(&self, coord: impl Into<Coord>) -> bool {
        self.index.contains_key(coord.into())
    }

    /// Insert a value and mark it most recently used
    ///
    /// Ownership of any value pushed out of the cache is handed back to the
    /// caller instead of being dropped silently.
    pub fn put(&mut self, coord: impl Into<Coord>, value: V) -> Option<Displaced<V>> {
        let coord = coord.into();

        if let Some(&idx) = self.index.get(coord) {
            let old = self.nodes[idx].value.replace(value);
            self.move_to_front(idx);
            return old.map(Displaced::Replaced);
        }

        let (idx, displaced) = match self.pop_free() {
            Some(idx) => (idx, None),
            None => self.evict(),
        };

        let node = &mut self.nodes[idx];
        node.coord = coord;
        node.value = Some(value);

        if let Err(e) = self.index.insert(coord, idx) {
            // Active entries never exceed half the index slots
            unreachable!("coordinate index rejected {}: {}", coord, e);
        }
        self.push_front(idx);

        displaced
    }

    /// Remove a coordinate from the cache, returning its value
    pub fn remove(&mut self, coord: impl Into<Coord>) -> Option<V> {
        let idx = self.index.remove(coord.into())?;
        self.unlink(idx);
        let value = self.nodes[idx].value.take();
        self.push_free(idx);
        value
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the fixed capacity
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate entries from most to least recently used
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    /// Remove every entry, most recently used first
    ///
    /// The cache is left exactly as freshly created.
    pub fn drain(&mut self) -> std::vec::IntoIter<(Coord, V)> {
        let mut entries = Vec::with_capacity(self.len());

        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = &mut self.nodes[idx];
            cursor = node.next;
            if let Some(value) = node.value.take() {
                entries.push((node.coord, value));
            }
        }

        self.index.clear();
        self.head = None;
        self.tail = None;
        self.reset_free_list();

        entries.into_iter()
    }

    /// Clear the cache, dropping every value
    pub fn clear(&mut self) {
        self.drain();
    }

    /// Relink every node into the free list in arena order
    fn reset_free_list(&mut self) {
        let capacity = self.nodes.len();
        for (idx, node) in self.nodes.iter_mut().enumerate() {
            node.prev = None;
            node.next = if idx + 1 < capacity { Some(idx + 1) } else { None };
        }
        self.free_head = if capacity > 0 { Some(0) } else { None };
    }

    fn pop_free(&mut self) -> Option<usize> {
        let idx = self.free_head?;
        self.free_head = self.nodes[idx].next.take();
        Some(idx)
    }

    fn push_free(&mut self, idx: usize) {
        let node = &mut self.nodes[idx];
        node.prev = None;
        node.next = self.free_head;
        self.free_head = Some(idx);
    }

    /// Detach the tail and drop it from the index, returning its slot
    fn evict(&mut self) -> (usize, Option<Displaced<V>>) {
        let Some(idx) = self.tail else {
            unreachable!("no free nodes but the recency list is empty");
        };

        self.unlink(idx);
        let node = &mut self.nodes[idx];
        self.index.remove(node.coord);

        trace!(coord = %node.coord, "evicted least recently used entry");

        let displaced = node
            .value
            .take()
            .map(|value| Displaced::Evicted(node.coord, value));
        (idx, displaced)
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return; // Already at front
        }

        self.unlink(idx);
        self.push_front(idx);
    }

    /// Link a detached node in at the head
    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = &mut self.nodes[idx];
            node.prev = None;
            node.next = old_head;
        }

        if let Some(head_idx) = old_head {
            self.nodes[head_idx].prev = Some(idx);
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Detach a node from the recency list
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = &mut self.nodes[idx];
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev_idx) => self.nodes[prev_idx].next = next,
            None => self.head = next,
        }

        match next {
            Some(next_idx) => self.nodes[next_idx].prev = prev,
            None => self.tail = prev,
        }
    }
}

/// Iterator over cache entries, most recently used first
pub struct Iter<'a, V> {
    nodes: &'a [Node<V>],
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Coord, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.cursor?];
        self.cursor = node.next;
        node.value.as_ref().map(|value| (node.coord, value))
    }
}
