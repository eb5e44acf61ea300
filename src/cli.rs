// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The surface is deliberately small: `watch [-r] cmd [args...]`. Everything
//! after the command name belongs to the command, including arguments that
//! look like flags (`watch cargo test -- --nocapture`).

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

use crate::config::DetectionPolicy;

/// Usage line printed when no command is given.
pub const USAGE: &str = "usage: watch [-r] cmd [args...]";

/// Command-line arguments for `watch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watch",
    version,
    about = "Run a command each time a file in the current directory is written.",
    override_usage = "watch [-r] cmd [args...]",
    long_about = None
)]
pub struct CliArgs {
    /// Watch all subdirectories recursively.
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// How changes are detected between polls.
    #[arg(long, value_enum, value_name = "POLICY", default_value_t = DetectionPolicy::PerPath)]
    pub policy: DetectionPolicy,

    /// Glob (relative to the watched directory) to skip while walking.
    ///
    /// May be given several times. Excluded directories are not descended into.
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to run, followed by its arguments.
    #[arg(
        value_name = "CMD",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

/// Parse the process arguments, exiting on error.
///
/// A missing command prints [`USAGE`] and exits with status 2. Other clap
/// errors (and `--help` / `--version`) are reported by clap itself.
pub fn parse() -> CliArgs {
    match try_parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(err) if err.kind() == ErrorKind::MissingRequiredArgument => usage(),
        Err(err) => err.exit(),
    }
}

/// Fallible parse from an explicit argument list (first item is the binary name).
pub fn try_parse_from<I, T>(itr: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(itr)
}

fn usage() -> ! {
    eprintln!("{USAGE}");
    std::process::exit(2);
}
