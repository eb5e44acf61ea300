// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] provides the `CommandRunner` trait and the `ProcessRunner`
//!   used in production, which tests replace with a recording fake.

pub mod runner;

pub use runner::{CommandOutcome, CommandRunner, ProcessRunner};
