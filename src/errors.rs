// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Walk and stat failures are fatal to the watcher, so they travel up through
//! the poll loop as `WatchError` and end the process. Failures of the watched
//! command never become errors; see [`crate::exec`].

use std::path::PathBuf;

use thiserror::Error;

use crate::cli::USAGE;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("{}", USAGE)]
    Usage,

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("{}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

pub type Result<T> = std::result::Result<T, WatchError>;
