// src/exec/runner.rs

//! Pluggable command runner.
//!
//! The poll loop talks to a `CommandRunner` instead of spawning processes
//! itself, so tests can count invocations without running anything.
//!
//! - `ProcessRunner` is the production implementation: it starts the program
//!   directly (no shell) with the watcher's stdio and waits for it.
//! - A runner never fails. Whatever happens to the child is reported as a
//!   [`CommandOutcome`], which the loop only logs.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::config::CommandSpec;

/// What happened to one execution of the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The process exited with this status code.
    Exited(i32),
    /// The process was terminated by a signal.
    Signalled,
    /// The process could not be started or waited on.
    SpawnFailed,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        matches!(self, CommandOutcome::Exited(0))
    }
}

/// Trait abstracting how the command is executed.
pub trait CommandRunner: Send {
    /// Run `spec` to completion.
    fn run<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>>;
}

/// Real runner used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>> {
        Box::pin(run_process(spec))
    }
}

async fn run_process(spec: &CommandSpec) -> CommandOutcome {
    debug!(cmd = %spec, "starting command");

    let mut cmd = Command::new(spec.program());
    cmd.args(spec.args())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let outcome = match cmd.status().await {
        Ok(status) => match status.code() {
            Some(code) => CommandOutcome::Exited(code),
            None => CommandOutcome::Signalled,
        },
        Err(err) => {
            debug!(cmd = %spec, error = %err, "command could not be run");
            CommandOutcome::SpawnFailed
        }
    };

    debug!(cmd = %spec, ?outcome, "command finished");
    outcome
}
