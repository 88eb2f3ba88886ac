//! # rampart-node: Checkpoint gates for a running node.
//!
//! - [`guard::ChainGuard`]: runs both checkpoint gates against one
//!   consistent snapshot of a shared chain index, and logs rejections
//! - [`config::GuardConfig`]: network mode, maturity span, log level

pub mod config;
pub mod guard;

pub use config::GuardConfig;
pub use guard::{ChainGuard, GuardStatus};
