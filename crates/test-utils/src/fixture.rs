use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::{FileTime, set_file_mtime};
use tempfile::TempDir;

/// Scratch directory tree with deterministic modification times.
///
/// Every `create` / `touch` stamps the file with the next tick of a private
/// clock that starts a minute in the future and advances one second per call.
/// Each stamped file is therefore strictly newer than anything written before
/// it, regardless of the filesystem's timestamp granularity.
pub struct TreeFixture {
    dir: TempDir,
    base: SystemTime,
    ticks: u64,
}

impl TreeFixture {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
            base: SystemTime::now() + Duration::from_secs(60),
            ticks: 0,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a file (creating parent directories) and stamp it.
    pub fn create(&mut self, rel: &str) -> io::Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, rel.as_bytes())?;
        self.stamp(&path)?;
        Ok(path)
    }

    /// Bump an existing file's modification time to the next tick.
    pub fn touch(&mut self, rel: &str) -> io::Result<()> {
        let path = self.path(rel);
        self.stamp(&path)
    }

    /// Set a file's modification time to an explicit value.
    pub fn set_mtime(&self, rel: &str, when: SystemTime) -> io::Result<()> {
        set_file_mtime(self.path(rel), FileTime::from_system_time(when))
    }

    pub fn mkdir(&self, rel: &str) -> io::Result<PathBuf> {
        let path = self.path(rel);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    pub fn remove(&self, rel: &str) -> io::Result<()> {
        fs::remove_file(self.path(rel))
    }

    fn stamp(&mut self, path: &Path) -> io::Result<()> {
        self.ticks += 1;
        let when = self.base + Duration::from_secs(self.ticks);
        set_file_mtime(path, FileTime::from_system_time(when))
    }
}
