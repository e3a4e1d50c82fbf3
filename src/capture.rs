// capture.rs - Append-only capture history shared by all live threads.
//
// Each record points at its parent; a thread only holds the index of its
// newest record. Forking a thread copies that index. Records are never
// mutated and are released in bulk when the scratch state is reset.

use std::ops::Range;

use smallvec::SmallVec;

/// Index of a capture-tree record, or [`CapturePtr::NONE`] for an empty
/// history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CapturePtr(u32);

impl CapturePtr {
    pub const NONE: CapturePtr = CapturePtr(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == CapturePtr::NONE
    }
}

/// One recorded group boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureNode {
    pub parent: CapturePtr,
    /// Byte offset of the boundary.
    pub at: usize,
    /// `2 * group` for an opening boundary, `2 * group + 1` for a closing one.
    pub slot: u32,
}

impl CaptureNode {
    #[inline]
    pub fn group(&self) -> usize {
        (self.slot / 2) as usize
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.slot % 2 == 0
    }
}

#[derive(Clone, Debug, Default)]
pub struct CaptureTree {
    nodes: Vec<CaptureNode>,
}

impl CaptureTree {
    pub fn new() -> Self {
        CaptureTree { nodes: Vec::new() }
    }

    /// Record a boundary under `parent` and return the new leaf.
    #[inline]
    pub fn push(&mut self, parent: CapturePtr, at: usize, slot: u32) -> CapturePtr {
        debug_assert!(parent.is_none() || (parent.0 as usize) < self.nodes.len());
        let ptr = CapturePtr(self.nodes.len() as u32);
        self.nodes.push(CaptureNode { parent, at, slot });
        ptr
    }

    #[inline]
    pub fn get(&self, ptr: CapturePtr) -> Option<&CaptureNode> {
        self.nodes.get(ptr.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every record, keeping the allocation.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Walk from `ptr` to the root, most recent boundary first.
    pub fn path(&self, ptr: CapturePtr) -> Path<'_> {
        Path { tree: self, at: ptr }
    }

    /// Group spans seen from leaf `ptr`, indexed by group (`0..=groups`).
    ///
    /// For every group the most recent boundary pair wins; earlier
    /// recordings along the same path are shadowed. Group 0 is left unset.
    pub fn resolve(&self, ptr: CapturePtr, groups: usize) -> SmallVec<[Option<Range<usize>>; 4]> {
        let slots = 2 * (groups + 1);
        let mut seen: SmallVec<[Option<usize>; 8]> = SmallVec::from_elem(None, slots);
        for node in self.path(ptr) {
            let slot = node.slot as usize;
            if slot < slots && seen[slot].is_none() {
                // an opening boundary only counts once its close is known
                if node.is_open() && seen[slot + 1].is_none() {
                    continue;
                }
                seen[slot] = Some(node.at);
            }
        }
        (0..=groups)
            .map(|g| match (seen[2 * g], seen[2 * g + 1]) {
                (Some(start), Some(end)) => Some(start..end),
                _ => None,
            })
            .collect()
    }
}

pub struct Path<'a> {
    tree: &'a CaptureTree,
    at: CapturePtr,
}

impl<'a> Iterator for Path<'a> {
    type Item = &'a CaptureNode;

    fn next(&mut self) -> Option<&'a CaptureNode> {
        let node = self.tree.get(self.at)?;
        self.at = node.parent;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(g: u32) -> u32 {
        2 * g
    }

    fn close(g: u32) -> u32 {
        2 * g + 1
    }

    #[test]
    fn forked_paths_share_prefix() {
        let mut tree = CaptureTree::new();
        let root = tree.push(CapturePtr::NONE, 0, open(1));
        let left = tree.push(root, 2, close(1));
        let right = tree.push(root, 3, close(1));
        assert_eq!(tree.resolve(left, 1)[1], Some(0..2));
        assert_eq!(tree.resolve(right, 1)[1], Some(0..3));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn path_is_most_recent_first() {
        let mut tree = CaptureTree::new();
        let a = tree.push(CapturePtr::NONE, 0, open(1));
        let b = tree.push(a, 1, open(2));
        let c = tree.push(b, 2, close(2));
        let d = tree.push(c, 3, close(1));
        let at: Vec<usize> = tree.path(d).map(|n| n.at).collect();
        assert_eq!(at, vec![3, 2, 1, 0]);
    }

    #[test]
    fn later_iteration_shadows_earlier() {
        // (a)+ over "aa"
        let mut tree = CaptureTree::new();
        let mut p = CapturePtr::NONE;
        for (at, slot) in [(0, open(1)), (1, close(1)), (1, open(1)), (2, close(1))] {
            p = tree.push(p, at, slot);
        }
        assert_eq!(tree.resolve(p, 1)[1], Some(1..2));
    }

    #[test]
    fn unclosed_open_is_ignored() {
        // group 1 closed at 0..1, then reopened at 2 without a close
        let mut tree = CaptureTree::new();
        let mut p = CapturePtr::NONE;
        for (at, slot) in [(0, open(1)), (1, close(1)), (2, open(1))] {
            p = tree.push(p, at, slot);
        }
        assert_eq!(tree.resolve(p, 1)[1], Some(0..1));
    }

    #[test]
    fn empty_history_resolves_to_unset() {
        let tree = CaptureTree::new();
        let groups = tree.resolve(CapturePtr::NONE, 2);
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(Option::is_none));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut tree = CaptureTree::new();
        tree.push(CapturePtr::NONE, 0, 0);
        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.get(CapturePtr(0)).is_none());
    }
}
