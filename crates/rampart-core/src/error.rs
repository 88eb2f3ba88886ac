//! Error types for Rampart.
use thiserror::Error;

use crate::types::Hash256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashParseError {
    #[error("invalid hash length: expected 64 hex chars, got {0}")] InvalidLength(usize),
    #[error("invalid hex: {0}")] InvalidHex(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("hash {got} at height {height} contradicts checkpoint {expected}")] HardenedMismatch { height: u64, expected: Hash256, got: Hash256 },
    #[error("height {height} is at or below sync checkpoint {sync_hash} at height {sync_height}")] BelowSyncCheckpoint { height: u64, sync_height: u64, sync_hash: Hash256 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("checkpoint heights not strictly increasing: {next} follows {prev}")] NonIncreasingHeight { prev: u64, next: u64 },
    #[error("invalid checkpoint hash at height {height}: {source}")] InvalidHash { height: u64, source: HashParseError },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainIndexError {
    #[error("empty chain: no best tip")] EmptyChain,
    #[error("duplicate block: {0}")] DuplicateBlock(Hash256),
    #[error("unknown parent: {0}")] UnknownParent(Hash256),
    #[error("unknown block: {0}")] UnknownBlock(Hash256),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown network: {0}")] UnknownNetwork(String),
}

#[derive(Error, Debug)]
pub enum RampartError {
    #[error(transparent)] Checkpoint(#[from] CheckpointError),
    #[error(transparent)] Registry(#[from] RegistryError),
    #[error(transparent)] ChainIndex(#[from] ChainIndexError),
    #[error(transparent)] HashParse(#[from] HashParseError),
    #[error(transparent)] Config(#[from] ConfigError),
}
