// src/cache.rs

//! Lifecycle of the static version cache: prewarm, then watch.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::fs::{FileSystem, RealFileSystem};
use crate::version::{IgnoreSet, VersionStore, DEFAULT_TOKEN_LEN};
use crate::watch::{spawn_bridge, BridgeHandle};

/// Everything needed to start a [`VersionCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Directory whose files get version tokens.
    pub root: PathBuf,
    /// Base file names to skip. Extend before calling `init`.
    pub ignores: IgnoreSet,
    /// Hex characters per token.
    pub token_len: usize,
}

impl CacheSettings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignores: IgnoreSet::default(),
            token_len: DEFAULT_TOKEN_LEN,
        }
    }
}

/// The static version cache as seen by request-serving code.
///
/// `get` is the only query. A missing root is not an error: the cache starts
/// empty and unwatched, and every lookup misses.
#[derive(Debug)]
pub struct VersionCache {
    store: Arc<VersionStore>,
    bridge: Option<BridgeHandle>,
}

impl VersionCache {
    /// Prewarm synchronously, then start watching in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn init(settings: CacheSettings) -> Self {
        Self::init_with_cancellation(settings, CancellationToken::new())
    }

    /// Like [`init`](Self::init), but the watch loop also stops when `cancel`
    /// is cancelled.
    pub fn init_with_cancellation(settings: CacheSettings, cancel: CancellationToken) -> Self {
        let (store, root_exists) = open_store(settings, Arc::new(RealFileSystem));
        if !root_exists {
            return Self {
                store,
                bridge: None,
            };
        }

        store.prewarm_all();

        let bridge = match spawn_bridge(Arc::clone(&store), cancel) {
            Ok(handle) => Some(handle),
            Err(err) => {
                error!("failed to start file watcher, tokens will not be invalidated: {err}");
                None
            }
        };

        Self { store, bridge }
    }

    /// Prewarm against `fs` without starting a watcher.
    pub fn prewarmed(settings: CacheSettings, fs: Arc<dyn FileSystem>) -> Self {
        let (store, root_exists) = open_store(settings, fs);
        if root_exists {
            store.prewarm_all();
        }
        Self {
            store,
            bridge: None,
        }
    }

    /// Version token for a root-relative asset path; empty if unavailable.
    pub fn get(&self, path: &str) -> String {
        self.store.get(path)
    }

    pub fn store(&self) -> &Arc<VersionStore> {
        &self.store
    }

    /// True while the background watch loop is running.
    pub fn is_watching(&self) -> bool {
        self.bridge.as_ref().is_some_and(|b| !b.is_finished())
    }

    /// Stop the watch loop and wait for it. Lookups keep working afterwards,
    /// but nothing invalidates entries any more.
    pub async fn shutdown(&mut self) {
        if let Some(bridge) = self.bridge.take() {
            bridge.shutdown().await;
            info!("static version cache stopped watching");
        }
    }
}

fn open_store(settings: CacheSettings, fs: Arc<dyn FileSystem>) -> (Arc<VersionStore>, bool) {
    let CacheSettings {
        root,
        ignores,
        token_len,
    } = settings;

    if !fs.is_dir(&root) {
        info!(
            "static root {:?} not found; version cache starts empty and unwatched",
            root
        );
        let store = VersionStore::new(root, fs, ignores, token_len);
        return (Arc::new(store), false);
    }

    // Canonicalize once so event paths and the root share a prefix.
    let root = match fs.canonicalize(&root) {
        Ok(canon) => canon,
        Err(err) => {
            warn!("could not canonicalize {:?}: {err:#}", root);
            root
        }
    };

    let store = VersionStore::new(root, fs, ignores, token_len);
    (Arc::new(store), true)
}
