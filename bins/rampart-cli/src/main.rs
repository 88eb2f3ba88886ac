//! rampart-cli: Inspect and exercise checkpoint policy from the command line.
//!
//! Lists the compiled-in checkpoints, checks a block hash against them,
//! reports the sync-progress estimate, and simulates the sync checkpoint over
//! a synthetic chain.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use parking_lot::RwLock;
use tracing::{debug, info};

use rampart_consensus::CheckpointRegistry;
use rampart_core::chain_index::{synthetic_hash, MemoryChainIndex};
use rampart_core::constants::NetworkType;
use rampart_core::types::Hash256;
use rampart_node_lib::{ChainGuard, GuardConfig};

/// Rampart checkpoint tool.
#[derive(Parser, Debug)]
#[command(name = "rampart-cli", version, about = "Checkpoint-based fork resistance tooling")]
struct Cli {
    /// Network: mainnet, testnet, or regtest (default: $RAMPART_NETWORK or mainnet)
    #[arg(long, global = true)]
    network: Option<NetworkType>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the hard-coded checkpoints for the network.
    Checkpoints,
    /// Check a block hash against the checkpoint at its height.
    Verify(VerifyArgs),
    /// Print the highest checkpointed height (sync-progress lower bound).
    Estimate,
    /// Build a synthetic chain and report its sync checkpoint.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Block height.
    #[arg(long)]
    height: u64,

    /// Block hash, 64 hex characters with optional 0x prefix.
    #[arg(long)]
    hash: Hash256,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Number of blocks in the chain, genesis included.
    #[arg(long)]
    length: u64,

    /// Maturity span override.
    #[arg(long)]
    span: Option<u64>,

    /// Candidate height to run the sync gate against.
    #[arg(long)]
    height: Option<u64>,
}

impl Cli {
    /// Environment config with command-line overrides applied.
    fn config(&self) -> Result<GuardConfig> {
        let mut config = GuardConfig::from_env().context("invalid RAMPART_* environment")?;
        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;

    init_logging(&config.log_level, &cli.log_format);
    debug!(?config, "resolved configuration");

    match &cli.command {
        Commands::Checkpoints => list_checkpoints(&config, cli.json),
        Commands::Verify(args) => verify(&config, args, cli.json),
        Commands::Estimate => estimate(&config, cli.json),
        Commands::Simulate(args) => simulate(config, args, cli.json),
    }
}

/// Print the registry, one `height hash` per line.
fn list_checkpoints(config: &GuardConfig, json: bool) -> Result<()> {
    let registry = CheckpointRegistry::for_network(config.network);
    if json {
        let entries: Vec<_> = registry
            .iter()
            .map(|e| serde_json::json!({ "height": e.height, "hash": e.hash.to_string() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if registry.is_empty() {
        println!("no checkpoints on {}", config.network);
    }
    for entry in registry.iter() {
        println!("{entry}");
    }
    Ok(())
}

/// Hardened check of one hash. Fails the process on a mismatch.
fn verify(config: &GuardConfig, args: &VerifyArgs, json: bool) -> Result<()> {
    let policy = config.policy();
    let expected = policy.registry().lookup(args.height);
    let valid = policy.is_hardened_valid(args.height, &args.hash);

    if json {
        let report = serde_json::json!({
            "network": config.network,
            "height": args.height,
            "hash": args.hash.to_string(),
            "checkpoint": expected.map(|h| h.to_string()),
            "valid": valid,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match expected {
            None => println!("height {} is not checkpointed on {}", args.height, config.network),
            Some(hash) => println!("checkpoint at {}: {hash}", args.height),
        }
        println!("{}", if valid { "valid" } else { "INVALID" });
    }

    if !valid {
        bail!(
            "hash {} contradicts the checkpoint at height {}",
            args.hash,
            args.height
        );
    }
    Ok(())
}

fn estimate(config: &GuardConfig, json: bool) -> Result<()> {
    let total = config.policy().total_checkpointed_height();
    if json {
        println!("{}", serde_json::json!({ "total_checkpointed_height": total }));
    } else {
        println!("{total}");
    }
    Ok(())
}

/// Linear chain using real checkpoint hashes where the registry has them, so
/// the locator has something to find.
fn simulate(mut config: GuardConfig, args: &SimulateArgs, json: bool) -> Result<()> {
    if let Some(span) = args.span {
        config.sync_span = span;
    }
    let registry = CheckpointRegistry::for_network(config.network);
    let index = MemoryChainIndex::linear(args.length, |height| {
        registry
            .lookup(height)
            .unwrap_or_else(|| synthetic_hash(height, 0))
    })
    .context("failed to build synthetic chain")?;

    let guard = ChainGuard::new(&config, Arc::new(RwLock::new(index)));
    let status = guard.status();
    info!(
        network = %status.network,
        length = args.length,
        span = config.sync_span,
        "simulated chain"
    );

    let verdict = args.height.map(|height| (height, guard.check_sync(height)));

    if json {
        let mut report = serde_json::to_value(&status)?;
        if let Some((height, accepted)) = verdict {
            report["candidate_height"] = height.into();
            report["accepted"] = accepted.into();
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match (status.best_height, status.sync_height) {
        (Some(best), Some(sync)) => {
            println!("best tip:        {best}");
            println!("sync checkpoint: {sync}");
        }
        _ => println!("empty chain: no sync checkpoint"),
    }
    match status.last_checkpoint_height {
        Some(height) => println!("last checkpoint: {height}"),
        None => println!("last checkpoint: none in chain"),
    }
    if let Some((height, accepted)) = verdict {
        println!(
            "height {height}: {}",
            if accepted { "accepted" } else { "rejected (at or below sync checkpoint)" }
        );
    }
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value defaults
/// to human-readable text. `RUST_LOG` takes precedence over `level_str`.
/// Logs go to stderr so stdout stays parseable.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
