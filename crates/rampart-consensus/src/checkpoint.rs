//! Hardened checkpoint validation and checkpoint lookup in the chain index.
//!
//! # Attack vectors
//!
//! - **Long-range rewrite:** Without checkpoints an attacker with enough hash
//!   power could rewrite arbitrarily deep history. A hard-coded checkpoint
//!   pins the block at its height, so any alternate history that disagrees
//!   there is rejected outright, along with every block built on top of it.
//!
//! - **Checkpoint spoofing:** The registry is compiled into the binary. An
//!   attacker would need to distribute a modified binary to exploit this,
//!   which is outside our threat model.
//!
//! # Policy
//!
//! The registry only ever *forbids*. A height with no entry accepts any hash;
//! a height with an entry accepts exactly that hash. Tightening this into
//! "must be checkpointed" would reject every ordinary block.
//!
//! # Usage
//!
//! The node calls [`is_hardened_valid`] (or [`check_hardened`] for an error
//! carrying both hashes) before a block at a known height is accepted. A
//! mismatch is permanent: the block must never become part of the best chain
//! and must not be retried. [`last_available_checkpoint`] is informational,
//! used at startup to pick an anchor, and never gates anything.

use rampart_core::chain_index::ChainIndex;
use rampart_core::constants::NetworkType;
use rampart_core::error::CheckpointError;
use rampart_core::types::{ChainNode, Hash256};

use crate::registry::CheckpointRegistry;

/// Whether `hash` is acceptable at `height` on `network`.
pub fn is_hardened_valid(network: NetworkType, height: u64, hash: &Hash256) -> bool {
    is_hardened_valid_with(CheckpointRegistry::for_network(network), height, hash)
}

/// Like [`is_hardened_valid`] but takes an explicit registry.
pub fn is_hardened_valid_with(registry: &CheckpointRegistry, height: u64, hash: &Hash256) -> bool {
    check_hardened_with(registry, height, hash).is_ok()
}

/// Verify that a block at `height` matches the checkpoint there, if any.
///
/// # Errors
///
/// Returns [`CheckpointError::HardenedMismatch`] when `height` is
/// checkpointed and `hash` differs from the registered hash.
pub fn check_hardened(
    network: NetworkType,
    height: u64,
    hash: &Hash256,
) -> Result<(), CheckpointError> {
    check_hardened_with(CheckpointRegistry::for_network(network), height, hash)
}

/// Like [`check_hardened`] but takes an explicit registry.
///
/// This is the testable core: production code passes the network's
/// registry, while tests can supply their own.
pub fn check_hardened_with(
    registry: &CheckpointRegistry,
    height: u64,
    hash: &Hash256,
) -> Result<(), CheckpointError> {
    match registry.lookup(height) {
        Some(expected) if expected != *hash => Err(CheckpointError::HardenedMismatch {
            height,
            expected,
            got: *hash,
        }),
        _ => Ok(()),
    }
}

/// Highest checkpointed height on `network`, or 0 if it has none.
///
/// Used as a lower bound on chain length for sync-progress reporting.
pub fn total_checkpointed_height(network: NetworkType) -> u64 {
    CheckpointRegistry::for_network(network).max_height()
}

/// The highest checkpoint on `network` whose block is in `index`.
///
/// Returns `None` when no registered hash is indexed, e.g. on a fresh node.
pub fn last_available_checkpoint<I: ChainIndex + ?Sized>(
    network: NetworkType,
    index: &I,
) -> Option<ChainNode> {
    last_available_checkpoint_with(CheckpointRegistry::for_network(network), index)
}

/// Like [`last_available_checkpoint`] but takes an explicit registry.
///
/// Searches newest to oldest; the first hit is the most restrictive anchor.
pub fn last_available_checkpoint_with<I: ChainIndex + ?Sized>(
    registry: &CheckpointRegistry,
    index: &I,
) -> Option<ChainNode> {
    registry
        .iter()
        .rev()
        .find_map(|entry| index.find_by_hash(&entry.hash))
}
