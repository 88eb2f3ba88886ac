//! Checkpoint gates over a shared chain index.
//!
//! The [`ChainGuard`] holds the node's chain index behind the same
//! `Arc<RwLock<_>>` the rest of the node uses to mutate it. Every query takes
//! one read lock and does all of its walking under it, so the sync checkpoint
//! is always computed from a tip and parent links that belong together. A
//! writer reorganizing the index waits until the walk is done.
//!
//! The hardened gate and the sync gate are independent; a block is accepted
//! only when both pass.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, trace, warn};

use rampart_consensus::CheckpointPolicy;
use rampart_core::chain_index::ChainIndex;
use rampart_core::constants::NetworkType;
use rampart_core::error::CheckpointError;
use rampart_core::types::{ChainNode, Hash256};

use crate::config::GuardConfig;

/// Snapshot of checkpoint state for progress reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardStatus {
    pub network: NetworkType,
    /// Best tip height, `None` for an empty index.
    pub best_height: Option<u64>,
    /// Current sync checkpoint height, `None` for an empty index.
    pub sync_height: Option<u64>,
    /// Highest hard-coded checkpoint present in the index.
    pub last_checkpoint_height: Option<u64>,
    /// Highest hard-coded checkpoint height for the network.
    pub total_checkpointed_height: u64,
}

/// Checkpoint policy bound to a shared chain index.
pub struct ChainGuard<I: ChainIndex> {
    policy: CheckpointPolicy,
    index: Arc<RwLock<I>>,
}

impl<I: ChainIndex> std::fmt::Debug for ChainGuard<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainGuard")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<I: ChainIndex> Clone for ChainGuard<I> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
            index: Arc::clone(&self.index),
        }
    }
}

impl<I: ChainIndex> ChainGuard<I> {
    /// Create a guard for the configured network over `index`.
    pub fn new(config: &GuardConfig, index: Arc<RwLock<I>>) -> Self {
        Self::with_policy(config.policy(), index)
    }

    /// Create a guard with an explicit policy.
    pub fn with_policy(policy: CheckpointPolicy, index: Arc<RwLock<I>>) -> Self {
        Self { policy, index }
    }

    pub fn policy(&self) -> &CheckpointPolicy {
        &self.policy
    }

    /// The shared index. Writers take `.write()` on it to extend or reorg.
    pub fn index(&self) -> &Arc<RwLock<I>> {
        &self.index
    }

    /// Run both gates for a candidate block at `height` with `hash`.
    ///
    /// # Errors
    ///
    /// - [`CheckpointError::HardenedMismatch`] if the block contradicts a
    ///   hard-coded checkpoint. Permanent; never retry the block.
    /// - [`CheckpointError::BelowSyncCheckpoint`] if `height` is at or below
    ///   the sync checkpoint. The block may be kept as a known alternative
    ///   but must not join the best chain.
    pub fn accept_block(&self, height: u64, hash: &Hash256) -> Result<(), CheckpointError> {
        self.check_hardened(height, hash)?;
        self.enforce_sync(height).inspect_err(|e| {
            debug!(height, %hash, "block below sync checkpoint: {e}");
        })?;
        trace!(height, %hash, "block passed checkpoint gates");
        Ok(())
    }

    /// Hardened gate. Does not touch the index.
    pub fn is_hardened_valid(&self, height: u64, hash: &Hash256) -> bool {
        self.check_hardened(height, hash).is_ok()
    }

    /// Hardened gate with the mismatch details.
    ///
    /// # Errors
    ///
    /// [`CheckpointError::HardenedMismatch`] on a conflicting hash.
    pub fn check_hardened(&self, height: u64, hash: &Hash256) -> Result<(), CheckpointError> {
        self.policy.check_hardened(height, hash).inspect_err(|e| {
            warn!(network = %self.policy.network(), "rejected block: {e}");
        })
    }

    /// Sync gate under one read lock.
    pub fn check_sync(&self, height: u64) -> bool {
        self.enforce_sync(height).is_ok()
    }

    /// Sync gate with the checkpoint details.
    ///
    /// # Errors
    ///
    /// [`CheckpointError::BelowSyncCheckpoint`] when `height` is too deep.
    pub fn enforce_sync(&self, height: u64) -> Result<(), CheckpointError> {
        let index = self.index.read();
        self.policy.enforce_sync(&*index, height)
    }

    /// Current sync checkpoint, `None` for an empty index.
    pub fn sync_checkpoint(&self) -> Option<ChainNode> {
        let index = self.index.read();
        self.policy.auto_select_sync_checkpoint(&*index)
    }

    /// Highest hard-coded checkpoint present in the index.
    pub fn last_available_checkpoint(&self) -> Option<ChainNode> {
        let index = self.index.read();
        self.policy.last_available_checkpoint(&*index)
    }

    /// Highest hard-coded checkpoint height for the network.
    pub fn total_checkpointed_height(&self) -> u64 {
        self.policy.total_checkpointed_height()
    }

    /// All progress figures from one snapshot of the index.
    pub fn status(&self) -> GuardStatus {
        let index = self.index.read();
        GuardStatus {
            network: self.policy.network(),
            best_height: index.best_tip().map(|tip| tip.height),
            sync_height: self
                .policy
                .auto_select_sync_checkpoint(&*index)
                .map(|node| node.height),
            last_checkpoint_height: self
                .policy
                .last_available_checkpoint(&*index)
                .map(|node| node.height),
            total_checkpointed_height: self.policy.total_checkpointed_height(),
        }
    }
}
