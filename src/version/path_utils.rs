// src/version/path_utils.rs

//! Conversions between absolute paths and cache keys.

use std::path::Path;

/// Normalize a caller-supplied relative asset path into a cache key.
///
/// Backslashes become `/`, leading separators and `.` segments are dropped.
/// Returns `None` for empty keys and for keys with `..` segments, so a lookup
/// can never reach outside the watched root.
pub fn normalize_key(path: &str) -> Option<String> {
    let replaced = path.replace('\\', "/");
    let mut segments = Vec::new();
    for seg in replaced.split('/') {
        match seg {
            "" | "." => continue,
            ".." => return None,
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
///
/// Returns `None` if the path cannot be related to `root`, or if it is the
/// root itself.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return non_empty(rel);
    }

    // macOS reports events under /private/var/... for roots under /var/...
    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return non_empty(rel);
        }
    }

    None
}

fn non_empty(rel: &Path) -> Option<String> {
    let s = rel.to_string_lossy().replace('\\', "/");
    if s.is_empty() { None } else { Some(s) }
}
