#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use staticver::fs::mock::MockFileSystem;
use staticver::version::{IgnoreSet, VersionStore, DEFAULT_TOKEN_LEN};
use staticver::CacheSettings;

/// Root used by mock-filesystem tests.
pub const MOCK_ROOT: &str = "/static";

/// Builder for `CacheSettings` to simplify test setup.
pub struct SettingsBuilder {
    settings: CacheSettings,
}

impl SettingsBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            settings: CacheSettings::new(root),
        }
    }

    pub fn ignore(mut self, name: &str) -> Self {
        self.settings.ignores.insert(name);
        self
    }

    pub fn no_ignores(mut self) -> Self {
        self.settings.ignores = IgnoreSet::empty();
        self
    }

    pub fn token_len(mut self, len: usize) -> Self {
        self.settings.token_len = len;
        self
    }

    pub fn build(self) -> CacheSettings {
        self.settings
    }
}

/// Mock tree rooted at [`MOCK_ROOT`], with helpers taking root-relative paths.
#[derive(Debug, Clone)]
pub struct MockTree {
    pub fs: MockFileSystem,
    root: PathBuf,
}

impl MockTree {
    pub fn new() -> Self {
        let fs = MockFileSystem::new();
        fs.add_dir(MOCK_ROOT);
        Self {
            fs,
            root: PathBuf::from(MOCK_ROOT),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn abs(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn file(&self, rel: &str, content: &str) -> &Self {
        self.fs.add_file(self.abs(rel), content.as_bytes().to_vec());
        self
    }

    pub fn dir(&self, rel: &str) -> &Self {
        self.fs.add_dir(self.abs(rel));
        self
    }

    pub fn remove(&self, rel: &str) -> &Self {
        self.fs.remove(self.abs(rel));
        self
    }

    pub fn reads(&self, rel: &str) -> usize {
        self.fs.read_count(self.abs(rel))
    }

    /// A store over this tree with default ignores and token length.
    pub fn store(&self) -> Arc<VersionStore> {
        self.store_with(IgnoreSet::default(), DEFAULT_TOKEN_LEN)
    }

    pub fn store_with(&self, ignores: IgnoreSet, token_len: usize) -> Arc<VersionStore> {
        Arc::new(VersionStore::new(
            self.root.clone(),
            Arc::new(self.fs.clone()),
            ignores,
            token_len,
        ))
    }
}

impl Default for MockTree {
    fn default() -> Self {
        Self::new()
    }
}
