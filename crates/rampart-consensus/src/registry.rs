//! Hard-coded checkpoint tables, one per network.
//!
//! Each table is an ordered map from height to block hash, compiled into the
//! binary and parsed once on first use. Afterwards it is never mutated, so
//! any number of threads may read it without synchronization.
//!
//! Only mainnet carries checkpoints. Testnet and regtest share an empty
//! table.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use rampart_core::constants::NetworkType;
use rampart_core::error::RegistryError;
use rampart_core::types::{CheckpointEntry, Hash256};
use tracing::debug;

/// Mainnet checkpoints as `(height, hex hash)`.
///
/// A good checkpoint block is surrounded by blocks with reasonable
/// timestamps (none before it with a later timestamp, none after it with an
/// earlier one) and contains no unusual transactions.
///
/// Heights must stay strictly increasing.
pub const MAINNET_CHECKPOINTS: &[(u64, &str)] = &[
    (0, "0x00006898b824b2c7d6e8bb648a2a0d6c10db1c487823d9675d790e0ab764da0b"),
    (500, "0x79f208c1bff9ee297a1555a0414d45df18fead3149cf9ac432375f26628a3a2a"),
    (5000, "0x690c7f4d8ba791b410c9a27e35589e97bfbe1eab26353286020402994648a9b5"),
    (50000, "0xdae74d0297d1e1f580a786e8825a00647cc202a26106ca1656c68fe7d7a263d2"),
    (87000, "0x14f11356eedf75692ccfe8a8710a5953c46a9039777ccaeaa7e340026d2a7dfe"),
    (90000, "0x8ec564d90a249490cc12a54dd88657607864d0bd354e6a633f9143604bf69293"),
    (100000, "0x80a1f3f49405975e3013beec54d7e9990ee9712f8140e0d43fede39aa39abb00"),
    (105000, "0xb449ce7b554a59bad0bfdead4f43cdd0e34ccc7caa7ed22d0d8712a1ae8322c2"),
];

/// Test networks have no checkpoints.
pub const TESTNET_CHECKPOINTS: &[(u64, &str)] = &[];

static MAINNET: LazyLock<CheckpointRegistry> = LazyLock::new(|| {
    CheckpointRegistry::from_hex_table(MAINNET_CHECKPOINTS)
        .expect("hard-coded mainnet checkpoints parse and are strictly increasing")
});

static TESTNET: LazyLock<CheckpointRegistry> = LazyLock::new(|| {
    CheckpointRegistry::from_hex_table(TESTNET_CHECKPOINTS)
        .expect("hard-coded testnet checkpoints parse and are strictly increasing")
});

/// An immutable, ordered `height → hash` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointRegistry {
    entries: BTreeMap<u64, Hash256>,
}

impl CheckpointRegistry {
    /// The process-wide registry for `network`.
    pub fn for_network(network: NetworkType) -> &'static Self {
        match network {
            NetworkType::Mainnet => &*MAINNET,
            NetworkType::Testnet | NetworkType::Regtest => &*TESTNET,
        }
    }

    /// Build a registry from entries given in ascending height order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NonIncreasingHeight`] if a height is not strictly
    /// greater than the one declared before it. Duplicates fall under this
    /// rule too.
    pub fn from_entries(
        entries: impl IntoIterator<Item = CheckpointEntry>,
    ) -> Result<Self, RegistryError> {
        let mut map = BTreeMap::new();
        let mut prev: Option<u64> = None;
        for entry in entries {
            if let Some(prev) = prev {
                if entry.height <= prev {
                    return Err(RegistryError::NonIncreasingHeight {
                        prev,
                        next: entry.height,
                    });
                }
            }
            prev = Some(entry.height);
            map.insert(entry.height, entry.hash);
        }
        debug!(
            count = map.len(),
            max_height = map.keys().next_back().copied().unwrap_or(0),
            "built checkpoint registry"
        );
        Ok(Self { entries: map })
    }

    /// Build a registry from a `(height, hex hash)` table.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidHash`] if a hash does not parse
    /// - [`RegistryError::NonIncreasingHeight`] as for [`from_entries`](Self::from_entries)
    pub fn from_hex_table(table: &[(u64, &str)]) -> Result<Self, RegistryError> {
        let entries = table
            .iter()
            .map(|&(height, hex)| {
                Hash256::from_hex(hex)
                    .map(|hash| CheckpointEntry { height, hash })
                    .map_err(|source| RegistryError::InvalidHash { height, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_entries(entries)
    }

    /// The registered hash at `height`, if any.
    pub fn lookup(&self, height: u64) -> Option<Hash256> {
        self.entries.get(&height).copied()
    }

    /// Highest checkpointed height, or 0 when the table is empty.
    pub fn max_height(&self) -> u64 {
        self.entries.keys().next_back().copied().unwrap_or(0)
    }

    /// The highest entry, if any.
    pub fn last(&self) -> Option<CheckpointEntry> {
        self.entries
            .iter()
            .next_back()
            .map(|(&height, &hash)| CheckpointEntry { height, hash })
    }

    /// Entries in ascending height order. Use `.rev()` for descending.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = CheckpointEntry> + '_ {
        self.entries
            .iter()
            .map(|(&height, &hash)| CheckpointEntry { height, hash })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The registered hash at `height` on `network`, if any.
pub fn lookup(network: NetworkType, height: u64) -> Option<Hash256> {
    CheckpointRegistry::for_network(network).lookup(height)
}

/// Highest checkpointed height on `network`, or 0 if it has none.
pub fn max_height(network: NetworkType) -> u64 {
    CheckpointRegistry::for_network(network).max_height()
}
