use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use staticver::errors::{Result, StaticverError};
use staticver::watch::DirectoryWatcher;

/// One call made against the fake watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCall {
    Watch(PathBuf),
    Unwatch(PathBuf),
}

/// A `DirectoryWatcher` that only records what it was asked to do.
///
/// Clones share the same log, so a test can keep one clone and hand the
/// other to the bridge.
#[derive(Debug, Clone, Default)]
pub struct FakeDirectoryWatcher {
    calls: Arc<Mutex<Vec<WatchCall>>>,
    fail_watch: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeDirectoryWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `watch_dir` fail for `dir`.
    pub fn fail_on(&self, dir: impl Into<PathBuf>) {
        self.fail_watch.lock().unwrap().push(dir.into());
    }

    pub fn calls(&self) -> Vec<WatchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn watch_count(&self, dir: impl AsRef<Path>) -> usize {
        let dir = dir.as_ref();
        self.calls()
            .iter()
            .filter(|c| matches!(c, WatchCall::Watch(p) if p == dir))
            .count()
    }

    pub fn unwatch_count(&self, dir: impl AsRef<Path>) -> usize {
        let dir = dir.as_ref();
        self.calls()
            .iter()
            .filter(|c| matches!(c, WatchCall::Unwatch(p) if p == dir))
            .count()
    }
}

impl DirectoryWatcher for FakeDirectoryWatcher {
    fn watch_dir(&mut self, dir: &Path) -> Result<()> {
        if self.fail_watch.lock().unwrap().iter().any(|d| d == dir) {
            return Err(StaticverError::Other(anyhow::anyhow!(
                "refusing to watch {:?}",
                dir
            )));
        }
        self.calls
            .lock()
            .unwrap()
            .push(WatchCall::Watch(dir.to_path_buf()));
        Ok(())
    }

    fn unwatch_dir(&mut self, dir: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(WatchCall::Unwatch(dir.to_path_buf()));
        Ok(())
    }
}
