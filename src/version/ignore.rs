// src/version/ignore.rs

use std::collections::HashSet;
use std::path::Path;

/// Base file names that never enter the cache and whose events are dropped.
///
/// Matching is on the last path component only, so `.DS_Store` is ignored at
/// any depth. Directories with an ignored name are not walked or watched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    /// An ignore set with nothing in it.
    pub fn empty() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// True if the base name of `path` is in the set.
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.contains(n))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for IgnoreSet {
    /// Ignores macOS Finder metadata files.
    fn default() -> Self {
        let mut set = Self::empty();
        set.insert(".DS_Store");
        set
    }
}

impl<S: Into<String>> Extend<S> for IgnoreSet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for name in iter {
            self.insert(name);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = Self::empty();
        set.extend(iter);
        set
    }
}
