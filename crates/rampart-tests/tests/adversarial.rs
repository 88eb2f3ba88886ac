//! Adversarial fork scenarios against the checkpoint gates.
//!
//! Attack vectors tested:
//! - Deep reorganization: a longer branch forking below the sync checkpoint
//! - Checkpoint rewrite: a branch carrying a different block at a
//!   checkpointed height
//! - Locator confusion: side branches that never reach a checkpoint
//! - Boundary probing: candidate heights around the sync checkpoint

use proptest::prelude::*;

use rampart_consensus::{CheckpointPolicy, CheckpointRegistry};
use rampart_core::chain_index::{synthetic_hash, ChainIndex, MemoryChainIndex};
use rampart_core::error::CheckpointError;
use rampart_core::types::{CheckpointEntry, Hash256};
use rampart_tests::helpers::{grow_branch, h, linear_chain, registry_at, scenario_registry};

const ATTACKER: u64 = 7;

// =========================================================================
// Deep reorganization
// =========================================================================

#[test]
fn longer_branch_below_sync_checkpoint_is_refused() {
    let policy = CheckpointPolicy::with_registry(scenario_registry(), 5000);
    let mut index = linear_chain(12_000);

    // Attacker forks at 6000 with a branch longer than the honest chain.
    let fork = h(6_000);
    let branch_tip = grow_branch(&mut index, &fork, 7_000, ATTACKER);
    assert!(branch_tip.height > index.best_tip().unwrap().height);

    // The first block past the fork point is already too deep.
    let err = policy.enforce_sync(&index, 6_001).unwrap_err();
    assert!(matches!(
        err,
        CheckpointError::BelowSyncCheckpoint { sync_height: 6_999, .. }
    ));
}

#[test]
fn shallow_reorg_above_sync_checkpoint_is_allowed() {
    let policy = CheckpointPolicy::with_registry(scenario_registry(), 5000);
    let mut index = linear_chain(12_000);
    let branch_tip = grow_branch(&mut index, &h(9_000), 5_500, ATTACKER);
    assert!(policy.check_sync(&index, 9_001));
    assert!(policy.is_hardened_valid(9_001, &synthetic_hash(9_001, ATTACKER)));

    // Once the branch is best, the sync checkpoint follows it.
    index.set_best_tip(&branch_tip.hash).unwrap();
    let sync = policy.auto_select_sync_checkpoint(&index).unwrap();
    assert_eq!(sync.height, 9_500);
    assert_eq!(sync.hash, synthetic_hash(sync.height, ATTACKER));
}

#[test]
fn sync_checkpoint_on_fork_point_refuses_fork() {
    let policy = CheckpointPolicy::with_registry(registry_at(&[0]), 10);
    let mut index = linear_chain(31);
    // Tip 30, sync checkpoint 20.
    grow_branch(&mut index, &h(19), 5, ATTACKER);
    assert!(!policy.check_sync(&index, 20));
    grow_branch(&mut index, &h(20), 5, ATTACKER + 1);
    assert!(policy.check_sync(&index, 21));
}

// =========================================================================
// Checkpoint rewrite
// =========================================================================

#[test]
fn branch_rewriting_a_checkpoint_is_refused_before_sync_applies() {
    // Short honest chain: the sync gate only pins genesis, so the
    // hardened gate is the one doing the work at height 500.
    let policy = CheckpointPolicy::with_registry(scenario_registry(), 5000);
    let mut index = linear_chain(100);
    let branch_tip = grow_branch(&mut index, &h(0), 600, ATTACKER);

    let forged = synthetic_hash(500, ATTACKER);
    assert!(policy.check_sync(&index, 500));
    let err = policy.check_hardened(500, &forged).unwrap_err();
    assert_eq!(
        err,
        CheckpointError::HardenedMismatch {
            height: 500,
            expected: h(500),
            got: forged,
        }
    );
    assert_eq!(branch_tip.height, 600);
}

#[test]
fn locator_ignores_branch_without_checkpoint_hashes() {
    let policy = CheckpointPolicy::with_registry(scenario_registry(), 5000);
    let mut index = linear_chain(400);
    grow_branch(&mut index, &h(0), 800, ATTACKER);
    let last = policy.last_available_checkpoint(&index).unwrap();
    assert_eq!(last.height, 0);
}

#[test]
fn locator_reports_checkpoint_on_side_branch() {
    // The locator searches the whole index, not just the best chain.
    let policy = CheckpointPolicy::with_registry(scenario_registry(), 5000);
    let mut index = MemoryChainIndex::linear(600, |height| {
        if height == 0 { h(0) } else { synthetic_hash(height, ATTACKER) }
    })
    .unwrap();
    let side = grow_branch(&mut index, &h(0), 499, 0);
    index.insert(h(500), &side.hash).unwrap();

    let last = policy.last_available_checkpoint(&index).unwrap();
    assert_eq!((last.height, last.hash), (500, h(500)));
    assert_ne!(index.best_tip().unwrap().hash, h(500));
}

// =========================================================================
// Property tests
// =========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A candidate passes the sync gate iff it is above `tip - min(tip, span)`.
    #[test]
    fn sync_gate_boundary(
        length in 1u64..2_000,
        span in 0u64..600,
        offset in 0u64..2_100,
    ) {
        let policy = CheckpointPolicy::with_registry(registry_at(&[0]), span);
        let index = linear_chain(length);
        let tip = length - 1;
        let sync_height = tip - tip.min(span);
        let candidate = offset.min(length + 50);

        let sync = policy.auto_select_sync_checkpoint(&index).unwrap();
        prop_assert_eq!(sync.height, sync_height);
        prop_assert_eq!(sync.hash, h(sync_height));
        prop_assert_eq!(policy.check_sync(&index, candidate), candidate > sync_height);
    }

    /// Any fork whose first block lands at or below the sync checkpoint is
    /// refused, however long the attacking branch grows.
    #[test]
    fn deep_fork_refused_regardless_of_length(
        length in 20u64..1_000,
        span in 1u64..200,
        depth in 0u64..1_000,
        branch_len in 1u64..400,
    ) {
        let policy = CheckpointPolicy::with_registry(registry_at(&[0]), span);
        let mut index = linear_chain(length);
        let tip = length - 1;
        let fork_height = tip - depth.min(tip);
        grow_branch(&mut index, &h(fork_height), branch_len, ATTACKER);

        let sync_height = tip - tip.min(span);
        let first = fork_height + 1;
        prop_assert_eq!(policy.check_sync(&index, first), first > sync_height);
    }

    /// The hardened gate only rejects a different hash at a pinned height.
    #[test]
    fn hardened_gate_pins_only_checkpointed_heights(
        height in prop_oneof![Just(0u64), Just(500), Just(5000), 0u64..10_000],
        bytes in any::<[u8; 32]>(),
    ) {
        let registry = scenario_registry();
        let hash = Hash256(bytes);
        let expected = match registry.lookup(height) {
            Some(pinned) => pinned == hash,
            None => true,
        };
        let policy = CheckpointPolicy::with_registry(registry, 5000);
        prop_assert_eq!(policy.is_hardened_valid(height, &hash), expected);
        prop_assert!(policy.is_hardened_valid(height, &h(height)));
    }

    /// The locator returns the highest checkpoint whose block is present.
    #[test]
    fn locator_returns_highest_present(mask in 0u16..1024) {
        let heights: Vec<u64> = (0..10).map(|i| i * 100).collect();
        let registry = registry_at(&heights);
        let present = |height: u64| height % 100 != 0 || mask & (1 << (height / 100)) != 0;
        let index = MemoryChainIndex::linear(1_000, |height| {
            if present(height) { h(height) } else { synthetic_hash(height, ATTACKER) }
        })
        .unwrap();

        let expected = heights.iter().rev().copied().find(|&height| present(height));
        let found = CheckpointPolicy::with_registry(registry, 5000)
            .last_available_checkpoint(&index)
            .map(|node| node.height);
        prop_assert_eq!(found, expected);
    }

    /// Registries only accept strictly increasing heights.
    #[test]
    fn registry_rejects_unordered_heights(a in 0u64..1_000, b in 0u64..1_000) {
        let built = CheckpointRegistry::from_entries(
            [a, b].map(|height| CheckpointEntry { height, hash: h(height) }),
        );
        prop_assert_eq!(built.is_ok(), a < b);
    }
}
