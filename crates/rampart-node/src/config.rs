//! Guard configuration.
//!
//! Provides [`GuardConfig`] with defaults for the network mode, maturity span,
//! and log level. It can be built programmatically, deserialized as part of a
//! host's config file, or read from `RAMPART_*` environment variables.

use serde::Deserialize;

use rampart_consensus::CheckpointPolicy;
use rampart_core::constants::{NetworkType, SYNC_CHECKPOINT_SPAN};
use rampart_core::error::ConfigError;

/// Environment variable selecting the network (`mainnet`, `testnet`, `regtest`).
pub const ENV_NETWORK: &str = "RAMPART_NETWORK";
/// Environment variable holding the log filter.
pub const ENV_LOG: &str = "RAMPART_LOG";

/// Configuration for a [`ChainGuard`](crate::guard::ChainGuard).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Which network's checkpoint table applies.
    pub network: NetworkType,
    /// Maturity span for the sync checkpoint. Only fixtures and simulation
    /// should change this.
    pub sync_span: u64,
    /// Log level filter string (e.g. "info", "debug", "rampart_node_lib=trace").
    pub log_level: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            network: NetworkType::default(),
            sync_span: SYNC_CHECKPOINT_SPAN,
            log_level: "info".to_string(),
        }
    }
}

impl GuardConfig {
    /// Defaults overridden by `RAMPART_NETWORK` and `RAMPART_LOG`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownNetwork`] if `RAMPART_NETWORK` is set to an
    /// unrecognised name.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(network) = var(ENV_NETWORK) {
            config.network = network.parse()?;
        }
        if let Some(level) = var(ENV_LOG) {
            config.log_level = level;
        }
        Ok(config)
    }

    /// Checkpoint policy for the configured network and span.
    pub fn policy(&self) -> CheckpointPolicy {
        CheckpointPolicy::new(self.network).with_sync_span(self.sync_span)
    }
}
