//! HashIndex behaviour checked against a std map

use ahash::RandomState;
use coordmap::{Coord, HashIndex};
use proptest::prelude::*;
use std::collections::HashMap;

proptest! {
    #[test]
    fn matches_std_map(
        capacity in 4usize..24,
        ops in prop::collection::vec((any::<bool>(), -6..6i32, -2..2i32, any::<u16>()), 0..300),
    ) {
        let mut index = HashIndex::with_capacity(capacity).unwrap();
        let mut model: HashMap<Coord, u16, RandomState> = HashMap::with_hasher(RandomState::new());

        for (insert, x, z, value) in ops {
            let coord = Coord::new(x, z);
            if insert {
                // Keep one slot spare so inserts never hit the full-table path
                if model.len() + 1 >= capacity && !model.contains_key(&coord) {
                    continue;
                }
                prop_assert_eq!(index.insert(coord, value).unwrap(), model.insert(coord, value));
            } else {
                prop_assert_eq!(index.remove(coord), model.remove(&coord));
            }

            prop_assert_eq!(index.len(), model.len());
            for (coord, value) in &model {
                prop_assert_eq!(index.get(*coord), Some(value));
            }
        }
    }

    #[test]
    fn colliding_keys_survive_removal(capacity in 2usize..64, skip in 0usize..4) {
        let first = Coord::new(0, 0);
        let bucket = first.bucket(capacity);
        let second = (1..)
            .map(|x| Coord::new(x, 0))
            .filter(|c| c.bucket(capacity) == bucket)
            .nth(skip)
            .unwrap();

        let mut index = HashIndex::with_capacity(capacity).unwrap();
        index.insert(first, 'a').unwrap();
        index.insert(second, 'b').unwrap();

        prop_assert_eq!(index.remove(first), Some('a'));
        prop_assert_eq!(index.get(second), Some(&'b'));
    }
}
