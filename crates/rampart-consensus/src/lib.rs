//! # rampart-consensus: Checkpoint gates for block acceptance.
//!
//! Two independent gates guard the best chain:
//!
//! - the **hardened check** ([`checkpoint`]) compares a candidate block's hash
//!   against the compiled-in [`registry`] for its height;
//! - the **sync check** ([`sync`]) refuses anything at or below a floating
//!   checkpoint that trails the best tip by a fixed maturity span.
//!
//! [`CheckpointPolicy`] bundles both with an explicit network mode.

pub mod checkpoint;
pub mod policy;
pub mod registry;
pub mod sync;

pub use checkpoint::{
    check_hardened, is_hardened_valid, last_available_checkpoint, total_checkpointed_height,
};
pub use policy::CheckpointPolicy;
pub use registry::CheckpointRegistry;
pub use sync::{auto_select_sync_checkpoint, check_sync, enforce_sync};
