//! Checkpoint policy bound to one network mode.
//!
//! The free functions in [`checkpoint`](crate::checkpoint) and
//! [`sync`](crate::sync) take the network or registry explicitly. A
//! [`CheckpointPolicy`] captures those choices once, so a validating engine
//! holds a single value instead of threading the network through every call,
//! and policies for different networks can coexist in one process.

use std::borrow::Cow;
use std::fmt;

use rampart_core::chain_index::ChainIndex;
use rampart_core::constants::{NetworkType, SYNC_CHECKPOINT_SPAN};
use rampart_core::error::CheckpointError;
use rampart_core::types::{ChainNode, Hash256};

use crate::checkpoint::{check_hardened_with, last_available_checkpoint_with};
use crate::registry::CheckpointRegistry;
use crate::sync::{auto_select_sync_checkpoint_with_span, enforce_sync_with_span};

/// Both checkpoint gates for one network.
#[derive(Clone, PartialEq, Eq)]
pub struct CheckpointPolicy {
    network: NetworkType,
    registry: Cow<'static, CheckpointRegistry>,
    sync_span: u64,
}

impl fmt::Debug for CheckpointPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckpointPolicy")
            .field("network", &self.network)
            .field("checkpoints", &self.registry.len())
            .field("sync_span", &self.sync_span)
            .finish()
    }
}

impl CheckpointPolicy {
    /// Policy for `network` with its compiled-in registry and the standard span.
    pub fn new(network: NetworkType) -> Self {
        Self {
            network,
            registry: Cow::Borrowed(CheckpointRegistry::for_network(network)),
            sync_span: SYNC_CHECKPOINT_SPAN,
        }
    }

    /// Policy over a caller-supplied registry and span.
    ///
    /// For synthetic fixtures and simulation. The network is reported as
    /// regtest since the table is not one of the compiled-in ones.
    pub fn with_registry(registry: CheckpointRegistry, sync_span: u64) -> Self {
        Self {
            network: NetworkType::Regtest,
            registry: Cow::Owned(registry),
            sync_span,
        }
    }

    /// Replace the maturity span, keeping the registry.
    pub fn with_sync_span(mut self, sync_span: u64) -> Self {
        self.sync_span = sync_span;
        self
    }

    pub fn network(&self) -> NetworkType {
        self.network
    }

    pub fn registry(&self) -> &CheckpointRegistry {
        &self.registry
    }

    pub fn sync_span(&self) -> u64 {
        self.sync_span
    }

    /// Hardened gate. See [`is_hardened_valid`](crate::checkpoint::is_hardened_valid).
    pub fn is_hardened_valid(&self, height: u64, hash: &Hash256) -> bool {
        self.check_hardened(height, hash).is_ok()
    }

    /// Hardened gate with the mismatch details.
    ///
    /// # Errors
    ///
    /// [`CheckpointError::HardenedMismatch`] on a conflicting hash.
    pub fn check_hardened(&self, height: u64, hash: &Hash256) -> Result<(), CheckpointError> {
        check_hardened_with(&self.registry, height, hash)
    }

    /// Highest checkpointed height, or 0 if the registry is empty.
    pub fn total_checkpointed_height(&self) -> u64 {
        self.registry.max_height()
    }

    /// Highest checkpoint whose block is present in `index`.
    pub fn last_available_checkpoint<I: ChainIndex + ?Sized>(&self, index: &I) -> Option<ChainNode> {
        last_available_checkpoint_with(&self.registry, index)
    }

    /// Current sync checkpoint for `index`'s best tip.
    pub fn auto_select_sync_checkpoint<I: ChainIndex + ?Sized>(
        &self,
        index: &I,
    ) -> Option<ChainNode> {
        auto_select_sync_checkpoint_with_span(index, self.sync_span)
    }

    /// Sync gate: false iff `height` is at or below the sync checkpoint.
    pub fn check_sync<I: ChainIndex + ?Sized>(&self, index: &I, height: u64) -> bool {
        self.enforce_sync(index, height).is_ok()
    }

    /// Sync gate with the checkpoint details.
    ///
    /// # Errors
    ///
    /// [`CheckpointError::BelowSyncCheckpoint`] when `height` is too deep.
    pub fn enforce_sync<I: ChainIndex + ?Sized>(
        &self,
        index: &I,
        height: u64,
    ) -> Result<(), CheckpointError> {
        enforce_sync_with_span(index, height, self.sync_span)
    }
}

impl Default for CheckpointPolicy {
    fn default() -> Self {
        Self::new(NetworkType::default())
    }
}
