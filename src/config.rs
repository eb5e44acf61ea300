// src/config.rs

//! Immutable watch configuration.
//!
//! Everything the poll loop needs is captured here once at startup and moved
//! into [`crate::engine::PollLoop`]. Nothing in this module is mutated after
//! construction.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::errors::{Result, WatchError};

/// Fixed delay between two polls of the tree.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Which change detector the loop uses.
///
/// - `PerPath`: remember every file's modification time and trigger on the
///   first file that got newer. New files are only recorded.
/// - `HighWater`: remember the newest modification time in the whole tree and
///   trigger when a walk finds something newer. New files trigger too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DetectionPolicy {
    #[default]
    PerPath,
    HighWater,
}

/// The command to re-run: program plus arguments, executed without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Build from an argument vector whose first item is the program.
    ///
    /// An empty vector is a usage error.
    pub fn from_argv<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().ok_or(WatchError::Usage)?;
        Ok(Self {
            program,
            args: argv.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Configuration for one watcher instance.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Directory whose entries are polled.
    pub root: PathBuf,

    /// Descend into subdirectories of `root`.
    pub recursive: bool,

    pub policy: DetectionPolicy,

    /// Glob patterns (relative to `root`) skipped during the walk.
    pub exclude: Vec<String>,

    /// Sleep between two walks.
    pub interval: Duration,

    pub command: CommandSpec,
}

impl WatchConfig {
    /// Non-recursive, per-path detection, no excludes, one second interval.
    pub fn new(root: impl Into<PathBuf>, command: CommandSpec) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            policy: DetectionPolicy::default(),
            exclude: Vec::new(),
            interval: POLL_INTERVAL,
            command,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn policy(mut self, policy: DetectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}
