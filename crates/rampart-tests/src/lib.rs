//! Scenario and adversarial test suite for Rampart.
//!
//! Integration tests drive the checkpoint gates across crate boundaries:
//! the registry and policy from rampart-consensus, the arena index from
//! rampart-core, and the locked guard from rampart-node-lib.

pub mod helpers;
