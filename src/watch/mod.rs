// src/watch/mod.rs

//! Polling-based change detection.
//!
//! This module is responsible for:
//! - Walking the watched directory and stat-ing every entry (`walker`).
//! - Compiling `--exclude` glob patterns (`patterns`).
//! - Deciding from one walk whether anything changed (`detector`).
//!
//! It does **not** run commands or sleep; the poll loop in
//! [`crate::engine`] drives it once per cycle.

pub mod detector;
pub mod patterns;
pub mod walker;

pub use detector::{
    ChangeDetector, EntryStream, HighWaterMarkDetector, Observation, PerPathDetector,
    ScanOutcome, WatchState, detector_for,
};
pub use patterns::ExcludeSet;
pub use walker::{TreeWalker, WalkEntry};
