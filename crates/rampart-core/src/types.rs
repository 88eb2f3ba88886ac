//! Core types: block hashes, checkpoint entries, and chain index nodes.
//!
//! Heights use u64 throughout. Hashes are opaque 32-byte identifiers; this
//! crate never computes them, it only compares them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HashParseError;

/// A 32-byte block hash.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse 64 hex characters, with or without a leading `0x`.
    ///
    /// # Errors
    ///
    /// [`HashParseError::InvalidLength`] if the digit count is not 64,
    /// [`HashParseError::InvalidHex`] on a non-hex character.
    pub fn from_hex(s: &str) -> Result<Self, HashParseError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 64 {
            return Err(HashParseError::InvalidLength(digits.len()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| HashParseError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Hash256 {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// A hard-coded `(height, hash)` pair asserting the canonical chain contains
/// exactly `hash` at `height`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CheckpointEntry {
    pub height: u64,
    pub hash: Hash256,
}

impl fmt::Display for CheckpointEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.height, self.hash)
    }
}

/// Stable arena index of a node in a chain index.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A block header's position in the chain index.
///
/// Owned by the chain index; consumers only read `height` and `hash` and
/// follow `parent`. The parent is an index into the same arena, never a
/// pointer, so pruning or reorganizing the index cannot leave a dangling
/// reference behind.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChainNode {
    /// This node's slot in the arena.
    pub id: NodeId,
    /// Distance from the root of its chain.
    pub height: u64,
    /// Block header hash.
    pub hash: Hash256,
    /// Parent slot, `None` for a root (genesis).
    pub parent: Option<NodeId>,
}

impl ChainNode {
    /// Whether this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The `(height, hash)` pair for this node.
    pub fn entry(&self) -> CheckpointEntry {
        CheckpointEntry {
            height: self.height,
            hash: self.hash,
        }
    }
}
