// src/version/store.rs

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::fs::{EntryKind, FileSystem};
use crate::version::hash::compute_token;
use crate::version::ignore::IgnoreSet;
use crate::version::path_utils::{normalize_key, relative_str};

/// Mapping from root-relative asset path to version token.
///
/// Every read and write goes through one exclusive lock. The map itself is
/// never handed out; callers only see cloned tokens or a [`snapshot`].
///
/// Entries never hold an empty token: a failed hash is not cached, so the
/// next lookup simply tries again.
///
/// [`snapshot`]: VersionStore::snapshot
pub struct VersionStore {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    ignores: IgnoreSet,
    token_len: usize,
    entries: Mutex<HashMap<String, String>>,
}

impl fmt::Debug for VersionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionStore")
            .field("root", &self.root)
            .field("token_len", &self.token_len)
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl VersionStore {
    pub fn new(
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        ignores: IgnoreSet,
        token_len: usize,
    ) -> Self {
        Self {
            root: root.into(),
            fs,
            ignores,
            token_len,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn ignores(&self) -> &IgnoreSet {
        &self.ignores
    }

    pub fn token_len(&self) -> usize {
        self.token_len
    }

    /// Walk the whole tree under the root and store a token for every file.
    ///
    /// The lock is held for the entire walk, so concurrent lookups wait until
    /// it finishes. Returns the number of tokens stored.
    pub fn prewarm_all(&self) -> usize {
        let mut entries = self.lock();
        let stored = self.walk_into(&self.root, &mut entries);
        info!(root = ?self.root, stored, "prewarmed static version cache");
        stored
    }

    /// Drop every entry and walk the tree again, under a single lock hold.
    pub fn rebuild(&self) -> usize {
        let mut entries = self.lock();
        entries.clear();
        let stored = self.walk_into(&self.root, &mut entries);
        info!(root = ?self.root, stored, "rebuilt static version cache");
        stored
    }

    /// Token for `path`, computing and caching it on a miss.
    ///
    /// An empty string means "unavailable": the file is missing, unreadable,
    /// ignored, or the path is not a valid key.
    pub fn get(&self, path: &str) -> String {
        let Some(key) = self.cacheable_key(path) else {
            return String::new();
        };

        let mut entries = self.lock();
        if let Some(token) = entries.get(&key) {
            return token.clone();
        }

        match self.compute(&key) {
            Some(token) => {
                entries.insert(key, token.clone());
                token
            }
            None => String::new(),
        }
    }

    /// Cached token for `path`, without touching the filesystem.
    pub fn peek(&self, path: &str) -> Option<String> {
        let key = normalize_key(path)?;
        self.lock().get(&key).cloned()
    }

    /// Overwrite the entry for `path`. Empty tokens are not stored.
    pub fn put(&self, path: &str, token: impl Into<String>) {
        let token = token.into();
        if token.is_empty() {
            debug!(path, "refusing to cache empty token");
            return;
        }
        let Some(key) = self.cacheable_key(path) else {
            return;
        };
        self.lock().insert(key, token);
    }

    /// Recompute the token for `path` from disk and store it.
    ///
    /// Hashing happens outside the lock. If it fails, any existing entry is
    /// left alone.
    pub fn refresh(&self, path: &str) -> Option<String> {
        let key = self.cacheable_key(path)?;
        let token = self.compute(&key)?;
        let previous = self.lock().insert(key.clone(), token.clone());
        match previous {
            None => info!("static file {key} is created."),
            Some(old) if old != token => info!("static file {key} is updated."),
            Some(_) => debug!("static file {key} is unchanged."),
        }
        Some(token)
    }

    /// Remove the entry for `path`, if any.
    pub fn delete(&self, path: &str) {
        let Some(key) = normalize_key(path) else {
            return;
        };
        if self.lock().remove(&key).is_some() {
            info!("static file {key} is deleted.");
        }
    }

    /// Remove every entry at or below the relative directory `dir`.
    pub fn delete_under(&self, dir: &str) -> usize {
        let Some(key) = normalize_key(dir) else {
            return 0;
        };
        let prefix = format!("{key}/");

        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|k, _| k != &key && !k.starts_with(&prefix));
        let removed = before - entries.len();
        drop(entries);

        if removed > 0 {
            info!("static dir {key} is deleted, evicted {removed} entries.");
        }
        removed
    }

    /// Sorted copy of the current mapping.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A poisoned lock only means another thread panicked mid-operation; the
    /// map itself is never left half-written, so keep serving.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cacheable_key(&self, path: &str) -> Option<String> {
        let key = normalize_key(path)?;
        if self.ignores.is_ignored(Path::new(&key)) {
            return None;
        }
        Some(key)
    }

    fn compute(&self, key: &str) -> Option<String> {
        compute_token(self.fs.as_ref(), &self.root.join(key), self.token_len)
    }

    fn walk_into(&self, dir: &Path, entries: &mut HashMap<String, String>) -> usize {
        let children = match self.fs.read_dir(dir) {
            Ok(children) => children,
            Err(err) => {
                warn!("cannot walk {:?}: {err:#}", dir);
                return 0;
            }
        };

        let mut stored = 0;
        for child in children {
            if self.ignores.is_ignored(&child) {
                continue;
            }
            match self.fs.entry_kind(&child) {
                Some(EntryKind::Dir) if self.fs.is_symlink(&child) => {
                    debug!("not following symlinked dir {:?}", child);
                }
                Some(EntryKind::Dir) => stored += self.walk_into(&child, entries),
                Some(EntryKind::File) => {
                    let Some(key) = relative_str(&self.root, &child) else {
                        continue;
                    };
                    if let Some(token) =
                        compute_token(self.fs.as_ref(), &child, self.token_len)
                    {
                        entries.insert(key, token);
                        stored += 1;
                    }
                }
                None => {}
            }
        }
        stored
    }
}
