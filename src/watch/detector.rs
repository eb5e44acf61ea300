// src/watch/detector.rs

//! Change detection over one walk of the tree.
//!
//! A detector consumes the lazy entry stream produced by
//! [`TreeWalker::entries`](crate::watch::TreeWalker::entries) and decides
//! whether the command should run. It never touches the filesystem itself, so
//! any other source of `WalkEntry` values (a native event backend, a test
//! vector) can drive it.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::trace;

use crate::config::DetectionPolicy;
use crate::errors::Result;
use crate::watch::walker::WalkEntry;

/// Entry stream handed to a detector for one walk.
pub type EntryStream<'a> = dyn Iterator<Item = Result<WalkEntry>> + 'a;

/// What a single scan concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No prior state existed; the walk only recorded a baseline.
    Baseline { visited: usize },
    /// Prior state existed and nothing got newer.
    Unchanged { visited: usize },
    /// `path` is newer than what was recorded; run the command.
    ///
    /// `visited` counts the entries consumed before the detector stopped.
    Changed { path: PathBuf, visited: usize },
}

impl ScanOutcome {
    pub fn is_trigger(&self) -> bool {
        matches!(self, ScanOutcome::Changed { .. })
    }

    pub fn visited(&self) -> usize {
        match self {
            ScanOutcome::Baseline { visited }
            | ScanOutcome::Unchanged { visited }
            | ScanOutcome::Changed { visited, .. } => *visited,
        }
    }
}

/// Decides, walk by walk, whether the tree changed.
pub trait ChangeDetector: Send + fmt::Debug {
    /// Consume (part of) one walk and report the outcome.
    ///
    /// The first `Err` from the stream is returned as is.
    fn scan(&mut self, entries: &mut EntryStream<'_>) -> Result<ScanOutcome>;

    /// Called once after the command ran for a `Changed` scan.
    fn rearm(&mut self);
}

/// Build the detector for a policy.
pub fn detector_for(policy: DetectionPolicy) -> Box<dyn ChangeDetector> {
    match policy {
        DetectionPolicy::PerPath => Box::new(PerPathDetector::default()),
        DetectionPolicy::HighWater => Box::new(HighWaterMarkDetector::default()),
    }
}

/// How a single path compares to its recorded timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    New,
    Unchanged,
    Newer,
}

/// Last observed modification time per relative path.
///
/// Each full walk is one generation: [`WatchState::begin_walk`] starts it,
/// `observe` stamps the paths it sees, and [`WatchState::prune_unseen`] drops
/// paths that were not seen (deleted files) so the map tracks the live tree.
#[derive(Debug, Default, Clone)]
pub struct WatchState {
    seen: HashMap<PathBuf, Recorded>,
    generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Recorded {
    modified: SystemTime,
    generation: u64,
}

impl WatchState {
    /// Start a new walk generation.
    pub fn begin_walk(&mut self) {
        self.generation += 1;
    }

    /// Record `modified` for `path` and classify it.
    ///
    /// A timestamp older than the recorded one is ignored, so recorded values
    /// never go backwards.
    pub fn observe(&mut self, path: &Path, modified: SystemTime) -> Observation {
        let generation = self.generation;
        match self.seen.entry(path.to_path_buf()) {
            Entry::Vacant(slot) => {
                slot.insert(Recorded { modified, generation });
                Observation::New
            }
            Entry::Occupied(mut slot) => {
                let recorded = slot.get_mut();
                recorded.generation = generation;
                if modified > recorded.modified {
                    recorded.modified = modified;
                    Observation::Newer
                } else {
                    Observation::Unchanged
                }
            }
        }
    }

    /// Drop every path not observed since the last `begin_walk`.
    ///
    /// Only valid after a complete walk. Returns how many paths were dropped.
    pub fn prune_unseen(&mut self) -> usize {
        let before = self.seen.len();
        let generation = self.generation;
        self.seen.retain(|_, recorded| recorded.generation == generation);
        before - self.seen.len()
    }

    pub fn get(&self, path: &Path) -> Option<SystemTime> {
        self.seen.get(path).map(|recorded| recorded.modified)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

/// Per-path comparison with early exit.
///
/// Only non-directory entries are tracked: a directory's timestamp moves
/// whenever something inside it is created or removed, and creation alone must
/// not trigger under this policy.
#[derive(Debug, Default)]
pub struct PerPathDetector {
    state: WatchState,
}

impl PerPathDetector {
    pub fn state(&self) -> &WatchState {
        &self.state
    }
}

impl ChangeDetector for PerPathDetector {
    fn scan(&mut self, entries: &mut EntryStream<'_>) -> Result<ScanOutcome> {
        let baseline = self.state.is_empty();
        let mut visited = 0;
        self.state.begin_walk();

        for entry in entries {
            let entry = entry?;
            visited += 1;
            if entry.is_dir {
                continue;
            }
            if self.state.observe(&entry.path, entry.modified) == Observation::Newer {
                return Ok(ScanOutcome::Changed {
                    path: entry.path,
                    visited,
                });
            }
        }

        let dropped = self.state.prune_unseen();
        if dropped > 0 {
            trace!(dropped, "forgot paths missing from this walk");
        }

        Ok(if baseline {
            ScanOutcome::Baseline { visited }
        } else {
            ScanOutcome::Unchanged { visited }
        })
    }

    /// Clears every recorded path; the next scan is a fresh baseline.
    fn rearm(&mut self) {
        self.state.clear();
    }
}

/// Tree-wide maximum modification time.
///
/// Directories count, so creating or deleting an entry raises the maximum
/// through its parent directory.
#[derive(Debug, Default)]
pub struct HighWaterMarkDetector {
    mark: Option<SystemTime>,
}

impl HighWaterMarkDetector {
    pub fn mark(&self) -> Option<SystemTime> {
        self.mark
    }
}

impl ChangeDetector for HighWaterMarkDetector {
    fn scan(&mut self, entries: &mut EntryStream<'_>) -> Result<ScanOutcome> {
        let mut newest: Option<(SystemTime, PathBuf)> = None;
        let mut visited = 0;

        for entry in entries {
            let entry = entry?;
            visited += 1;
            if newest.as_ref().is_none_or(|(t, _)| entry.modified > *t) {
                newest = Some((entry.modified, entry.path));
            }
        }

        let Some(mark) = self.mark else {
            self.mark = newest.map(|(t, _)| t);
            return Ok(ScanOutcome::Baseline { visited });
        };

        match newest {
            Some((t, path)) if t > mark => {
                self.mark = Some(t);
                Ok(ScanOutcome::Changed { path, visited })
            }
            _ => Ok(ScanOutcome::Unchanged { visited }),
        }
    }

    /// Keeps the mark, which the triggering scan already raised. Anything
    /// written while the command ran is newer and triggers the next scan.
    fn rearm(&mut self) {}
}
