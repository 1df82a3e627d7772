//! Position cache for an ordered sequence of entities.
//!
//! The dictionary does no range scanning: before shifting for an insert or
//! delete of `count` elements at position `p`, the caller gathers exactly the
//! ids currently at positions `>= p` and passes that set.

use std::collections::HashMap;
use std::hash::Hash;

use tessera_types::BlockId;

/// Maps each id to its zero-based position in a tracked sequence.
#[derive(Clone, Debug)]
pub struct IndexDictionary<K = BlockId> {
    positions: HashMap<K, usize>,
}

impl<K> Default for IndexDictionary<K> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> IndexDictionary<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an ordered sequence.
    pub fn from_ordered<'a>(ordered: impl IntoIterator<Item = &'a K>) -> Self
    where
        K: 'a,
    {
        let mut dict = Self::new();
        dict.update(ordered);
        dict
    }

    /// Replace every position with the id's index in `ordered`.
    pub fn update<'a>(&mut self, ordered: impl IntoIterator<Item = &'a K>)
    where
        K: 'a,
    {
        self.positions = ordered
            .into_iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();
    }

    pub fn get(&self, id: &K) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Assign a position; `None` removes the entry.
    pub fn set(&mut self, id: K, position: Option<usize>) {
        match position {
            Some(position) => {
                self.positions.insert(id, position);
            }
            None => {
                self.positions.remove(&id);
            }
        }
    }

    /// Shift each listed id up by `count`. Untracked ids are ignored.
    pub fn increase<'a>(&mut self, ids: impl IntoIterator<Item = &'a K>, count: usize)
    where
        K: 'a,
    {
        for id in ids {
            if let Some(position) = self.positions.get_mut(id) {
                *position += count;
            }
        }
    }

    /// Shift each listed id down by `count`, dropping any that would go negative.
    pub fn decrease<'a>(&mut self, ids: impl IntoIterator<Item = &'a K>, count: usize)
    where
        K: 'a,
    {
        for id in ids {
            let Some(position) = self.positions.get(id).copied() else {
                continue;
            };
            match position.checked_sub(count) {
                Some(shifted) => {
                    self.positions.insert(id.clone(), shifted);
                }
                None => {
                    self.positions.remove(id);
                }
            }
        }
    }

    pub fn increase_one(&mut self, id: &K) {
        self.increase(std::iter::once(id), 1);
    }

    pub fn decrease_one(&mut self, id: &K) {
        self.decrease(std::iter::once(id), 1);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.positions.iter().map(|(id, position)| (id, *position))
    }
}
