//! # rampart-core
//! Foundation types for checkpoint-based fork resistance: hashes, network
//! modes, the error taxonomy, and the chain index the checkpoint logic walks.

pub mod chain_index;
pub mod constants;
pub mod error;
pub mod types;
