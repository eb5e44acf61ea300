// src/watch/patterns.rs

use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{Result, WatchError};

/// Compiled `--exclude` globs.
///
/// Patterns are matched against paths relative to the watched root with
/// forward slashes, e.g. `"target/debug/app"`. An empty set matches nothing.
#[derive(Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<String>,
    set: Option<GlobSet>,
}

impl fmt::Debug for ExcludeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludeSet")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl ExcludeSet {
    /// Compile the given patterns. Fails on the first invalid glob.
    pub fn build(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }

        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            let glob = Glob::new(pat).map_err(|source| WatchError::Pattern {
                pattern: pat.clone(),
                source,
            })?;
            builder.add(glob);
        }

        let set = builder.build().map_err(|source| WatchError::Pattern {
            pattern: patterns.join(", "),
            source,
        })?;

        Ok(Self {
            patterns: patterns.to_vec(),
            set: Some(set),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_none()
    }

    /// True if `rel_path` (relative, forward slashes) is excluded.
    pub fn matches(&self, rel_path: &str) -> bool {
        match &self.set {
            Some(set) => set.is_match(rel_path),
            None => false,
        }
    }
}
