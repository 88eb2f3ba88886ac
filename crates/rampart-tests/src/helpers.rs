//! Shared chain-building helpers for the integration tests.

use rampart_consensus::CheckpointRegistry;
use rampart_core::chain_index::{synthetic_hash, ChainIndex, MemoryChainIndex};
use rampart_core::types::{ChainNode, CheckpointEntry, Hash256};

/// Hash of the main-branch block at `height`.
pub fn h(height: u64) -> Hash256 {
    synthetic_hash(height, 0)
}

/// Linear chain of `length` main-branch blocks.
pub fn linear_chain(length: u64) -> MemoryChainIndex {
    MemoryChainIndex::linear(length, h).expect("synthetic hashes are unique")
}

/// Registry with a main-branch checkpoint at each of `heights`.
pub fn registry_at(heights: &[u64]) -> CheckpointRegistry {
    CheckpointRegistry::from_entries(heights.iter().map(|&height| CheckpointEntry {
        height,
        hash: h(height),
    }))
    .expect("heights given in ascending order")
}

/// Registry `{0, 500, 5000}` on the main branch.
pub fn scenario_registry() -> CheckpointRegistry {
    registry_at(&[0, 500, 5000])
}

/// Grow a side branch of `len` blocks on top of the block `parent`.
///
/// Blocks are tagged `branch` so they never collide with the main branch.
/// Does not move the best tip. Returns the branch tip, or the parent itself
/// when `len` is zero.
pub fn grow_branch(
    index: &mut MemoryChainIndex,
    parent: &Hash256,
    len: u64,
    branch: u64,
) -> ChainNode {
    let mut tip = index.find_by_hash(parent).expect("branch parent is indexed");
    for _ in 0..len {
        tip = index
            .insert(synthetic_hash(tip.height + 1, branch), &tip.hash)
            .expect("branch hashes are unique");
    }
    tip
}
