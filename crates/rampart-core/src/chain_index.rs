//! Chain index interface and in-memory arena implementation.
//!
//! The [`ChainIndex`] trait is the read-only view the checkpoint logic needs:
//! the best tip, parent traversal, and lookup by hash. The full node owns the
//! real index; [`MemoryChainIndex`] backs tests, benches, and simulation.
//!
//! Nodes live in an arena and refer to their parent by [`NodeId`]. A node is
//! never mutated after insertion, so competing branches coexist and switching
//! the best tip is a single pointer update.

use std::collections::HashMap;

use crate::error::ChainIndexError;
use crate::types::{ChainNode, Hash256, NodeId};

/// Read-only view of the block index.
///
/// Implementations must present a consistent snapshot for the duration of a
/// borrow: a traversal that starts at [`best_tip`](Self::best_tip) and walks
/// [`parent`](Self::parent) links must not observe a concurrent reorg. Callers
/// that share an index across threads hold a read lock while they walk it.
pub trait ChainIndex: Send + Sync {
    /// Current best-known tip. `None` if the index holds no blocks.
    fn best_tip(&self) -> Option<ChainNode>;

    /// Look up a node by its arena slot.
    fn node(&self, id: NodeId) -> Option<ChainNode>;

    /// Parent of `node`, or `None` at a root.
    ///
    /// Default implementation resolves `node.parent` through [`node`](Self::node).
    fn parent(&self, node: &ChainNode) -> Option<ChainNode> {
        node.parent.and_then(|id| self.node(id))
    }

    /// Look up a node by block hash, on any branch.
    fn find_by_hash(&self, hash: &Hash256) -> Option<ChainNode>;

    /// Whether a block with `hash` is known.
    fn contains(&self, hash: &Hash256) -> bool {
        self.find_by_hash(hash).is_some()
    }
}

/// Arena-backed chain index held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryChainIndex {
    /// Every known node, addressed by `NodeId`.
    nodes: Vec<ChainNode>,
    /// Hash → slot.
    by_hash: HashMap<Hash256, NodeId>,
    /// Current best tip slot. `None` means empty index.
    best: Option<NodeId>,
}

impl MemoryChainIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index holding only a genesis block, which becomes the tip.
    pub fn with_genesis(hash: Hash256) -> Self {
        let mut index = Self::new();
        let id = index.push(hash, 0, None);
        index.best = Some(id);
        index
    }

    /// Build a single linear chain of `length` blocks, heights `0..length`,
    /// with the last block as the best tip.
    ///
    /// # Errors
    ///
    /// [`ChainIndexError::DuplicateBlock`] if `hash_at` repeats a hash.
    pub fn linear(
        length: u64,
        hash_at: impl Fn(u64) -> Hash256,
    ) -> Result<Self, ChainIndexError> {
        let mut index = Self::new();
        if length == 0 {
            return Ok(index);
        }
        index.insert_genesis(hash_at(0))?;
        for height in 1..length {
            index.extend_tip(hash_at(height))?;
        }
        Ok(index)
    }

    /// Insert a root block at height 0.
    ///
    /// Becomes the best tip if the index was empty.
    ///
    /// # Errors
    ///
    /// [`ChainIndexError::DuplicateBlock`] if the hash is already indexed.
    pub fn insert_genesis(&mut self, hash: Hash256) -> Result<ChainNode, ChainIndexError> {
        self.ensure_new(&hash)?;
        let id = self.push(hash, 0, None);
        if self.best.is_none() {
            self.best = Some(id);
        }
        Ok(self.nodes[id.index()])
    }

    /// Insert `hash` as a child of `parent`, at `parent.height + 1`.
    ///
    /// Does not move the best tip.
    ///
    /// # Errors
    ///
    /// - [`ChainIndexError::DuplicateBlock`] if the hash is already indexed
    /// - [`ChainIndexError::UnknownParent`] if `parent` is not indexed
    pub fn insert(
        &mut self,
        hash: Hash256,
        parent: &Hash256,
    ) -> Result<ChainNode, ChainIndexError> {
        self.ensure_new(&hash)?;
        let parent_id = *self
            .by_hash
            .get(parent)
            .ok_or(ChainIndexError::UnknownParent(*parent))?;
        let height = self.nodes[parent_id.index()].height + 1;
        let id = self.push(hash, height, Some(parent_id));
        Ok(self.nodes[id.index()])
    }

    /// Insert `hash` on top of the best tip and make it the new tip.
    ///
    /// # Errors
    ///
    /// - [`ChainIndexError::EmptyChain`] if there is no tip to extend
    /// - [`ChainIndexError::DuplicateBlock`] if the hash is already indexed
    pub fn extend_tip(&mut self, hash: Hash256) -> Result<ChainNode, ChainIndexError> {
        let tip = self.best_tip().ok_or(ChainIndexError::EmptyChain)?;
        let node = self.insert(hash, &tip.hash)?;
        self.best = Some(node.id);
        Ok(node)
    }

    /// Point the best tip at an already-indexed block.
    ///
    /// # Errors
    ///
    /// [`ChainIndexError::UnknownBlock`] if `hash` is not indexed.
    pub fn set_best_tip(&mut self, hash: &Hash256) -> Result<ChainNode, ChainIndexError> {
        let id = *self
            .by_hash
            .get(hash)
            .ok_or(ChainIndexError::UnknownBlock(*hash))?;
        self.best = Some(id);
        Ok(self.nodes[id.index()])
    }

    /// Walk back from `node` to its ancestor at `height`.
    ///
    /// Returns `node` itself when `height == node.height`, and `None` when
    /// `height` is above `node` or below its root.
    pub fn ancestor_at_height(&self, node: &ChainNode, height: u64) -> Option<ChainNode> {
        let mut current = *node;
        while current.height > height {
            current = self.parent(&current)?;
        }
        (current.height == height).then_some(current)
    }

    /// Number of indexed blocks across all branches.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no blocks have been indexed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn ensure_new(&self, hash: &Hash256) -> Result<(), ChainIndexError> {
        if self.by_hash.contains_key(hash) {
            return Err(ChainIndexError::DuplicateBlock(*hash));
        }
        Ok(())
    }

    fn push(&mut self, hash: Hash256, height: u64, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ChainNode {
            id,
            height,
            hash,
            parent,
        });
        self.by_hash.insert(hash, id);
        id
    }
}

impl ChainIndex for MemoryChainIndex {
    fn best_tip(&self) -> Option<ChainNode> {
        self.best.map(|id| self.nodes[id.index()])
    }

    fn node(&self, id: NodeId) -> Option<ChainNode> {
        self.nodes.get(id.index()).copied()
    }

    fn find_by_hash(&self, hash: &Hash256) -> Option<ChainNode> {
        self.by_hash.get(hash).map(|id| self.nodes[id.index()])
    }
}

/// Deterministic, collision-free hash for synthetic chains.
///
/// Encodes `height` and `branch` into distinct byte ranges, so every
/// `(height, branch)` pair maps to a different hash.
pub fn synthetic_hash(height: u64, branch: u64) -> Hash256 {
    let mut bytes = [0u8; 32];
    bytes[0] = 0x5c;
    bytes[8..16].copy_from_slice(&height.to_be_bytes());
    bytes[16..24].copy_from_slice(&branch.to_be_bytes());
    Hash256(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(height: u64) -> Hash256 {
        synthetic_hash(height, 0)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    #[test]
    fn empty_index_has_no_tip() {
        let index = MemoryChainIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.best_tip().is_none());
        assert!(index.find_by_hash(&h(0)).is_none());
    }

    #[test]
    fn genesis_becomes_tip() {
        let index = MemoryChainIndex::with_genesis(h(0));
        let tip = index.best_tip().unwrap();
        assert_eq!(tip.height, 0);
        assert_eq!(tip.hash, h(0));
        assert!(tip.is_root());
        assert!(index.parent(&tip).is_none());
    }

    #[test]
    fn linear_chain_heights_follow_parents() {
        let index = MemoryChainIndex::linear(10, h).unwrap();
        assert_eq!(index.len(), 10);
        let mut node = index.best_tip().unwrap();
        assert_eq!(node.height, 9);
        while let Some(parent) = index.parent(&node) {
            assert_eq!(parent.height + 1, node.height);
            assert_eq!(parent.hash, h(parent.height));
            node = parent;
        }
        assert_eq!(node.height, 0);
    }

    #[test]
    fn linear_zero_length_is_empty() {
        let index = MemoryChainIndex::linear(0, h).unwrap();
        assert!(index.is_empty());
        assert!(index.best_tip().is_none());
    }

    // ------------------------------------------------------------------
    // Insertion errors
    // ------------------------------------------------------------------

    #[test]
    fn duplicate_block_rejected() {
        let mut index = MemoryChainIndex::with_genesis(h(0));
        assert_eq!(
            index.insert_genesis(h(0)),
            Err(ChainIndexError::DuplicateBlock(h(0)))
        );
        index.extend_tip(h(1)).unwrap();
        assert_eq!(
            index.insert(h(1), &h(0)),
            Err(ChainIndexError::DuplicateBlock(h(1)))
        );
    }

    #[test]
    fn unknown_parent_rejected() {
        let mut index = MemoryChainIndex::with_genesis(h(0));
        assert_eq!(
            index.insert(h(5), &h(4)),
            Err(ChainIndexError::UnknownParent(h(4)))
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn extend_empty_chain_fails() {
        let mut index = MemoryChainIndex::new();
        assert_eq!(index.extend_tip(h(0)), Err(ChainIndexError::EmptyChain));
    }

    #[test]
    fn set_unknown_tip_fails() {
        let mut index = MemoryChainIndex::with_genesis(h(0));
        assert_eq!(
            index.set_best_tip(&h(9)),
            Err(ChainIndexError::UnknownBlock(h(9)))
        );
        assert_eq!(index.best_tip().unwrap().hash, h(0));
    }

    // ------------------------------------------------------------------
    // Forks
    // ------------------------------------------------------------------

    #[test]
    fn fork_does_not_move_tip_until_selected() {
        let mut index = MemoryChainIndex::linear(5, h).unwrap();
        let fork = synthetic_hash(3, 1);
        let node = index.insert(fork, &h(2)).unwrap();
        assert_eq!(node.height, 3);
        assert_eq!(index.best_tip().unwrap().hash, h(4));

        index.set_best_tip(&fork).unwrap();
        let tip = index.best_tip().unwrap();
        assert_eq!(tip.hash, fork);
        assert_eq!(index.parent(&tip).unwrap().hash, h(2));
        // The old branch is still indexed.
        assert!(index.contains(&h(4)));
    }

    #[test]
    fn second_genesis_does_not_replace_tip() {
        let mut index = MemoryChainIndex::with_genesis(h(0));
        let other = synthetic_hash(0, 7);
        let root = index.insert_genesis(other).unwrap();
        assert!(root.is_root());
        assert_eq!(index.best_tip().unwrap().hash, h(0));
    }

    // ------------------------------------------------------------------
    // ancestor_at_height
    // ------------------------------------------------------------------

    #[test]
    fn ancestor_at_height_walks_back() {
        let index = MemoryChainIndex::linear(20, h).unwrap();
        let tip = index.best_tip().unwrap();
        assert_eq!(index.ancestor_at_height(&tip, 7).unwrap().hash, h(7));
        assert_eq!(index.ancestor_at_height(&tip, 19).unwrap(), tip);
        assert_eq!(index.ancestor_at_height(&tip, 0).unwrap().hash, h(0));
        assert!(index.ancestor_at_height(&tip, 20).is_none());
    }

    #[test]
    fn synthetic_hashes_are_distinct() {
        assert_ne!(synthetic_hash(1, 0), synthetic_hash(0, 1));
        assert_ne!(synthetic_hash(1, 0), synthetic_hash(2, 0));
        assert_ne!(synthetic_hash(0, 0), Hash256([0; 32]));
    }

    // --- proptest ---

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ancestor_hash_matches_height(len in 1u64..300, pick in 0u64..300) {
            let index = MemoryChainIndex::linear(len, h).unwrap();
            let tip = index.best_tip().unwrap();
            let target = pick % len;
            let ancestor = index.ancestor_at_height(&tip, target).unwrap();
            prop_assert_eq!(ancestor.hash, h(target));
            prop_assert_eq!(index.find_by_hash(&h(target)), Some(ancestor));
        }
    }
}
