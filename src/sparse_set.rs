// sparse_set.rs - Insertion-ordered set of state ids with O(1) clear.
//
// https://research.swtch.com/sparse

use crate::node::StateId;

#[derive(Clone, Debug, Default)]
pub struct SparseSet {
    len: usize,
    dense: Vec<StateId>,
    sparse: Vec<u32>,
}

impl SparseSet {
    pub fn new(capacity: usize) -> Self {
        SparseSet {
            len: 0,
            dense: vec![0; capacity],
            sparse: vec![0; capacity],
        }
    }

    /// Grow to hold ids below `capacity`. Never shrinks; always clears.
    pub fn reserve(&mut self, capacity: usize) {
        self.clear();
        if capacity > self.dense.len() {
            self.dense.resize(capacity, 0);
            self.sparse.resize(capacity, 0);
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `id`; false if it was already present.
    #[inline]
    pub fn insert(&mut self, id: StateId) -> bool {
        if self.contains(id) {
            return false;
        }
        debug_assert!(self.len < self.capacity(), "sparse set overflow");
        self.dense[self.len] = id;
        self.sparse[id as usize] = self.len as u32;
        self.len += 1;
        true
    }

    #[inline]
    pub fn contains(&self, id: StateId) -> bool {
        let idx = self.sparse[id as usize] as usize;
        idx < self.len && self.dense[idx] == id
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.dense[..self.len].iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut set = SparseSet::new(8);
        assert!(set.insert(3));
        assert!(set.insert(5));
        assert!(!set.insert(3));
        assert!(set.contains(3));
        assert!(!set.contains(4));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn keeps_insertion_order() {
        let mut set = SparseSet::new(8);
        for id in [6, 1, 4] {
            set.insert(id);
        }
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![6, 1, 4]);
    }

    #[test]
    fn clear_forgets_members() {
        let mut set = SparseSet::new(4);
        set.insert(2);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(2));
        assert!(set.insert(2));
    }

    #[test]
    fn reserve_grows_and_clears() {
        let mut set = SparseSet::new(2);
        set.insert(1);
        set.reserve(10);
        assert_eq!(set.capacity(), 10);
        assert!(set.is_empty());
        assert!(set.insert(9));
        set.reserve(4);
        assert_eq!(set.capacity(), 10);
    }
}
