// src/watch/bridge.rs

//! Directory watch bridge: keeps one subscription per live directory and
//! turns filesystem events into cache updates.
//!
//! The bridge is synchronous and owns no channels. The async loop in
//! [`crate::watch::watcher`] feeds it one event at a time, which keeps the
//! dispatch rules testable with a fake [`DirectoryWatcher`] and
//! [`crate::fs::mock::MockFileSystem`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace, warn};

use crate::errors::Result;
use crate::fs::EntryKind;
use crate::version::path_utils::relative_str;
use crate::version::VersionStore;
use crate::watch::events::{FsEvent, FsEventKind};

/// Subscribe/unsubscribe primitive for a single directory (non-recursive).
pub trait DirectoryWatcher: Send {
    fn watch_dir(&mut self, dir: &Path) -> Result<()>;
    fn unwatch_dir(&mut self, dir: &Path) -> Result<()>;
}

impl DirectoryWatcher for RecommendedWatcher {
    fn watch_dir(&mut self, dir: &Path) -> Result<()> {
        self.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    fn unwatch_dir(&mut self, dir: &Path) -> Result<()> {
        self.unwatch(dir)?;
        Ok(())
    }
}

/// Event-to-cache state machine plus the set of subscribed directories.
///
/// | event           | directory           | file            |
/// |-----------------|---------------------|-----------------|
/// | created         | watch (and rescan)  | refresh token   |
/// | removed         | unwatch             | delete token    |
/// | modified        | ignored             | refresh token   |
/// | renamed away    | unwatch             | delete token    |
///
/// The target is stat'ed when the event is consumed and that result decides
/// the column. Created/modified events for paths that no longer exist are
/// dropped; removals for such paths are applied. A removal of a path in the
/// watch set always drops its subscriptions and the entries below it, even
/// if a file has since taken its place.
#[derive(Debug)]
pub struct WatchBridge<W: DirectoryWatcher> {
    store: Arc<VersionStore>,
    watcher: W,
    watched: BTreeSet<PathBuf>,
}

impl<W: DirectoryWatcher> WatchBridge<W> {
    pub fn new(store: Arc<VersionStore>, watcher: W) -> Self {
        Self {
            store,
            watcher,
            watched: BTreeSet::new(),
        }
    }

    pub fn store(&self) -> &Arc<VersionStore> {
        &self.store
    }

    pub fn watcher(&self) -> &W {
        &self.watcher
    }

    pub fn is_watched(&self, dir: &Path) -> bool {
        self.watched.contains(dir)
    }

    /// Currently subscribed directories, sorted.
    pub fn watched_dirs(&self) -> impl Iterator<Item = &Path> {
        self.watched.iter().map(PathBuf::as_path)
    }

    /// Subscribe the root and every directory below it.
    ///
    /// Returns the number of new subscriptions.
    pub fn subscribe_tree(&mut self) -> usize {
        let root = self.store.root().to_path_buf();
        self.subscribe_dir(&root, false)
    }

    /// Apply one event.
    pub fn handle(&mut self, event: FsEvent) {
        if event.kind == FsEventKind::Rescan {
            self.rescan();
            return;
        }

        let path = event.path;
        if self.store.ignores().is_ignored(&path) {
            trace!(?path, "ignored name; dropping event");
            return;
        }

        let stat = self.store.fs().entry_kind(&path);
        let kind = match event.kind {
            FsEventKind::Renamed if stat.is_some() => FsEventKind::Created,
            FsEventKind::Renamed => FsEventKind::RenamedAway,
            other => other,
        };

        if path == self.store.root() {
            if stat.is_none() && matches!(kind, FsEventKind::Removed | FsEventKind::RenamedAway) {
                warn!(?path, "watched root disappeared; cache emptied");
                self.unsubscribe_dir(&path);
                self.store.rebuild();
            }
            return;
        }

        let Some(key) = relative_str(self.store.root(), &path) else {
            debug!(?path, "event outside watched root; dropping");
            return;
        };

        debug!(?kind, key = %key, ?stat, "dispatching watch event");

        match (kind, stat) {
            (FsEventKind::Created, Some(EntryKind::Dir)) if self.store.fs().is_symlink(&path) => {
                debug!(key = %key, "not following symlinked dir");
            }
            (FsEventKind::Created, Some(EntryKind::Dir)) => {
                let added = self.subscribe_dir(&path, true);
                debug!(key = %key, added, "new directory subscribed");
            }
            (FsEventKind::Created | FsEventKind::Modified, Some(EntryKind::File)) => {
                // A watched directory replaced by a file before its removal was seen.
                if self.is_watched(&path) {
                    self.forget_dir(&path, &key);
                }
                self.store.refresh(&key);
            }
            (FsEventKind::Modified, Some(EntryKind::Dir)) => {}
            (FsEventKind::Removed | FsEventKind::RenamedAway, Some(_) | None) => {
                if self.is_watched(&path) {
                    self.forget_dir(&path, &key);
                }
                self.store.delete(&key);
                if stat != Some(EntryKind::File) {
                    self.store.delete_under(&key);
                }
            }
            (_, None) => {
                trace!(key = %key, "target vanished before event was consumed; dropping");
            }
            (FsEventKind::Renamed | FsEventKind::Rescan, Some(_)) => {}
        }
    }

    /// Re-read the whole tree after the backend reported lost events.
    fn rescan(&mut self) {
        warn!("watch backend requested a rescan");
        let fs = Arc::clone(self.store.fs());
        let stale: Vec<PathBuf> = self
            .watched
            .iter()
            .filter(|dir| !fs.is_dir(dir))
            .cloned()
            .collect();
        for dir in stale {
            self.unsubscribe_dir(&dir);
        }
        self.store.rebuild();
        self.subscribe_tree();
    }

    fn forget_dir(&mut self, path: &Path, key: &str) {
        self.unsubscribe_dir(path);
        self.store.delete_under(key);
    }

    /// Watch `dir` and every directory below it. With `refresh_files`, also
    /// hash files already present, which covers files created before the new
    /// directory's subscription was in place.
    fn subscribe_dir(&mut self, dir: &Path, refresh_files: bool) -> usize {
        let mut added = 0;
        if !self.watched.contains(dir) {
            match self.watcher.watch_dir(dir) {
                Ok(()) => {
                    debug!(?dir, "watching directory");
                    self.watched.insert(dir.to_path_buf());
                    added += 1;
                }
                Err(err) => warn!(?dir, "failed to watch directory: {err}"),
            }
        }

        let fs = Arc::clone(self.store.fs());
        let children = match fs.read_dir(dir) {
            Ok(children) => children,
            Err(err) => {
                debug!(?dir, "cannot list directory: {err:#}");
                return added;
            }
        };

        for child in children {
            if self.store.ignores().is_ignored(&child) {
                continue;
            }
            match fs.entry_kind(&child) {
                Some(EntryKind::Dir) if !fs.is_symlink(&child) => {
                    added += self.subscribe_dir(&child, refresh_files);
                }
                Some(EntryKind::File) if refresh_files => {
                    if let Some(key) = relative_str(self.store.root(), &child) {
                        self.store.refresh(&key);
                    }
                }
                _ => {}
            }
        }
        added
    }

    /// Drop the subscription for `dir` and any watched directory below it.
    fn unsubscribe_dir(&mut self, dir: &Path) {
        let doomed: Vec<PathBuf> = self
            .watched
            .iter()
            .filter(|w| w.starts_with(dir))
            .cloned()
            .collect();

        for w in doomed {
            // The OS usually drops the watch itself when a directory goes away.
            if let Err(err) = self.watcher.unwatch_dir(&w) {
                debug!(dir = ?w, "unwatch failed: {err}");
            }
            self.watched.remove(&w);
            debug!(dir = ?w, "stopped watching directory");
        }
    }
}
