// src/watch/walker.rs

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::trace;
use walkdir::{DirEntry, WalkDir};

use crate::errors::{Result, WatchError};
use crate::watch::patterns::ExcludeSet;

/// One entry seen during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path relative to the walk root; the root itself is `"."`.
    pub path: PathBuf,
    pub modified: SystemTime,
    pub is_dir: bool,
}

/// Lazily walks the watched directory and stats every entry.
///
/// - Entries come out in file-name order, root first.
/// - Without recursion only the root and its direct non-directory children
///   are visited; subdirectories are skipped entirely.
/// - Symlinks are not followed; a link reports its own modification time.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    recursive: bool,
    exclude: ExcludeSet,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>, recursive: bool, exclude: ExcludeSet) -> Self {
        Self {
            root: root.into(),
            recursive,
            exclude,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Start a new walk.
    ///
    /// Nothing is read until the iterator is advanced, and dropping it stops
    /// the walk. The first error ends the usefulness of the walk; callers are
    /// expected to propagate it.
    pub fn entries(&self) -> impl Iterator<Item = Result<WalkEntry>> + '_ {
        let mut walk = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();
        if !self.recursive {
            walk = walk.max_depth(1);
        }

        walk.into_iter()
            .filter_entry(move |entry| self.should_visit(entry))
            .map(move |res| self.to_entry(res?))
    }

    fn should_visit(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        if !self.recursive && entry.file_type().is_dir() {
            return false;
        }
        if self.exclude.is_empty() {
            return true;
        }
        let rel = relative_str(&self.root, entry.path());
        if self.exclude.matches(&rel) {
            trace!(path = %rel, "excluded from walk");
            return false;
        }
        true
    }

    fn to_entry(&self, entry: DirEntry) -> Result<WalkEntry> {
        let metadata = entry.metadata()?;
        let modified = metadata.modified().map_err(|source| WatchError::Metadata {
            path: entry.path().to_path_buf(),
            source,
        })?;

        Ok(WalkEntry {
            path: relative_path(&self.root, entry.path()),
            modified,
            is_dir: metadata.is_dir(),
        })
    }
}

/// `path` relative to `root`, or `"."` for the root itself.
fn relative_path(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

/// Relative path as a string with forward slashes, for glob matching.
fn relative_str(root: &Path, path: &Path) -> String {
    relative_path(root, path)
        .to_string_lossy()
        .replace('\\', "/")
}
