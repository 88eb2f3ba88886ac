//! Sync checkpoint: a floating checkpoint trailing the best tip.
//!
//! Hard-coded checkpoints only protect the heights chosen in advance. The
//! sync checkpoint extends that protection to any height by treating every
//! block at least [`SYNC_CHECKPOINT_SPAN`] blocks below the best tip as final.
//! Reorganizations shallower than the span stay possible; deeper ones are
//! refused.
//!
//! The checkpoint is recomputed from the live index on every call and never
//! cached, so it always reflects the current tip. Callers sharing the index
//! must hold its read lock across the whole call; a concurrent reorg during
//! the walk could otherwise yield a checkpoint from a different branch.

use rampart_core::chain_index::ChainIndex;
use rampart_core::constants::SYNC_CHECKPOINT_SPAN;
use rampart_core::error::CheckpointError;
use rampart_core::types::ChainNode;

/// Select the sync checkpoint for the current best tip.
///
/// Returns `None` only when the index has no tip.
pub fn auto_select_sync_checkpoint<I: ChainIndex + ?Sized>(index: &I) -> Option<ChainNode> {
    auto_select_sync_checkpoint_with_span(index, SYNC_CHECKPOINT_SPAN)
}

/// Like [`auto_select_sync_checkpoint`] with an explicit maturity span.
///
/// Walks back from the tip while the current block is still inside the
/// maturity window (`height + span > tip.height`) and has a parent. The
/// result is the first ancestor at least `span` blocks deep, or the root
/// when the chain is shorter than that.
pub fn auto_select_sync_checkpoint_with_span<I: ChainIndex + ?Sized>(
    index: &I,
    span: u64,
) -> Option<ChainNode> {
    let tip = index.best_tip()?;
    let mut node = tip;
    while node.height.saturating_add(span) > tip.height {
        match index.parent(&node) {
            Some(parent) => node = parent,
            None => break,
        }
    }
    Some(node)
}

/// Whether a block at `height` may extend or replace the best chain.
///
/// False iff `height` is at or below the current sync checkpoint. An empty
/// index has no checkpoint, so every height passes.
pub fn check_sync<I: ChainIndex + ?Sized>(index: &I, height: u64) -> bool {
    check_sync_with_span(index, height, SYNC_CHECKPOINT_SPAN)
}

/// Like [`check_sync`] with an explicit maturity span.
pub fn check_sync_with_span<I: ChainIndex + ?Sized>(index: &I, height: u64, span: u64) -> bool {
    enforce_sync_with_span(index, height, span).is_ok()
}

/// Reject a block at or below the sync checkpoint.
///
/// # Errors
///
/// Returns [`CheckpointError::BelowSyncCheckpoint`] naming the checkpoint.
/// The caller must refuse the reorganization but may keep tracking the
/// branch as a known alternative.
pub fn enforce_sync<I: ChainIndex + ?Sized>(index: &I, height: u64) -> Result<(), CheckpointError> {
    enforce_sync_with_span(index, height, SYNC_CHECKPOINT_SPAN)
}

/// Like [`enforce_sync`] with an explicit maturity span.
pub fn enforce_sync_with_span<I: ChainIndex + ?Sized>(
    index: &I,
    height: u64,
    span: u64,
) -> Result<(), CheckpointError> {
    match auto_select_sync_checkpoint_with_span(index, span) {
        Some(sync) if height <= sync.height => Err(CheckpointError::BelowSyncCheckpoint {
            height,
            sync_height: sync.height,
            sync_hash: sync.hash,
        }),
        _ => Ok(()),
    }
}
