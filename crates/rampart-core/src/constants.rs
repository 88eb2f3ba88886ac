//! Protocol constants and network selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Number of blocks a block must trail the best tip before it can become
/// the sync checkpoint.
pub const SYNC_CHECKPOINT_SPAN: u64 = 5000;

/// Network type: Mainnet, Testnet, or Regtest.
///
/// Selects which hard-coded checkpoint table applies. Only Mainnet carries
/// checkpoints; both test networks run unconstrained by the registry.
///
/// # Examples
///
/// ```
/// use rampart_core::constants::NetworkType;
/// let net = NetworkType::default();
/// assert_eq!(net, NetworkType::Mainnet);
/// assert!(!net.is_test());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Production network.
    #[default]
    Mainnet,
    /// Public test network.
    Testnet,
    /// Local regression-test network.
    Regtest,
}

impl NetworkType {
    /// All network types, in declaration order.
    pub const ALL: [NetworkType; 3] = [Self::Mainnet, Self::Testnet, Self::Regtest];

    /// Whether this is one of the test networks.
    ///
    /// # Examples
    ///
    /// ```
    /// use rampart_core::constants::NetworkType;
    /// assert!(NetworkType::Testnet.is_test());
    /// assert!(NetworkType::Regtest.is_test());
    /// ```
    pub fn is_test(&self) -> bool {
        !matches!(self, Self::Mainnet)
    }

    /// Lowercase name, as accepted by [`FromStr`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rampart_core::constants::NetworkType;
    /// assert_eq!(NetworkType::Testnet.as_str(), "testnet");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Regtest => "regtest",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            _ => Err(ConfigError::UnknownNetwork(s.to_string())),
        }
    }
}
