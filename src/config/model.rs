// src/config/model.rs

use std::path::Path;

use serde::Deserialize;

use crate::cache::CacheSettings;
use crate::version::{IgnoreSet, DEFAULT_TOKEN_LEN};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [cache]
/// root = "static"
/// ignore = [".DS_Store", "Thumbs.db"]
/// token_len = 4
/// ```
///
/// All sections and keys are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub cache: CacheSection,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheSection {
    /// Asset root. Relative paths are resolved against the config file's
    /// directory.
    #[serde(default = "default_root")]
    pub root: String,

    /// Base file names that never get a token.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Hex characters per token (1..=64).
    #[serde(default = "default_token_len")]
    pub token_len: usize,
}

fn default_root() -> String {
    "static".to_string()
}

fn default_ignore() -> Vec<String> {
    vec![".DS_Store".to_string()]
}

fn default_token_len() -> usize {
    DEFAULT_TOKEN_LEN
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            ignore: default_ignore(),
            token_len: default_token_len(),
        }
    }
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub cache: CacheSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(cache: CacheSection) -> Self {
        Self { cache }
    }

    /// Runtime settings, with a relative root resolved against `base_dir`.
    pub fn settings(&self, base_dir: &Path) -> CacheSettings {
        CacheSettings {
            root: base_dir.join(&self.cache.root),
            ignores: self.cache.ignore.iter().cloned().collect::<IgnoreSet>(),
            token_len: self.cache.token_len,
        }
    }
}
