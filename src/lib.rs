// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{CommandSpec, WatchConfig};
use crate::engine::PollLoop;
use crate::exec::ProcessRunner;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the immutable watch config built from the CLI
/// - the poll loop with the real process runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config = config_from_args(&args, PathBuf::from("."))?;
    let poller = PollLoop::new(config, ProcessRunner::new())?;

    tokio::select! {
        res = poller.run() => res.map_err(anyhow::Error::from),
        sig = tokio::signal::ctrl_c() => {
            sig.context("listening for Ctrl+C")?;
            info!("interrupted, stopping");
            Ok(())
        }
    }
}

/// Map parsed CLI arguments onto a [`WatchConfig`] rooted at `root`.
pub fn config_from_args(args: &CliArgs, root: PathBuf) -> Result<WatchConfig> {
    let command = CommandSpec::from_argv(args.command.iter().cloned())?;
    Ok(WatchConfig::new(root, command)
        .recursive(args.recursive)
        .policy(args.policy)
        .exclude(args.exclude.iter().cloned()))
}
