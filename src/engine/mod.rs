// src/engine/mod.rs

//! The poll loop.
//!
//! Walk, detect, run, sleep; strictly in sequence, forever. See
//! [`PollLoop`].

pub mod poller;

pub use poller::{CycleReport, PollLoop};
