// src/version/hash.rs

use std::path::Path;

use blake3::Hasher;
use tracing::debug;

use crate::fs::FileSystem;

/// Default number of hex characters in a version token.
pub const DEFAULT_TOKEN_LEN: usize = 4;

/// Length of a full BLAKE3 digest in hex.
pub const MAX_TOKEN_LEN: usize = 64;

/// Token for an in-memory buffer: the first `len` hex characters of its
/// BLAKE3 digest. `len` is clamped to `1..=MAX_TOKEN_LEN`.
pub fn token_for_bytes(bytes: &[u8], len: usize) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    let hex = hasher.finalize().to_hex();
    let len = len.clamp(1, MAX_TOKEN_LEN);
    hex.as_str()[..len].to_string()
}

/// Read a whole file and compute its token.
///
/// Returns `None` if the file cannot be opened or read. An empty file is not
/// a failure; it still gets a token.
pub fn compute_token(fs: &dyn FileSystem, path: &Path, len: usize) -> Option<String> {
    debug!("loaded static {:?}", path);
    match fs.read(path) {
        Ok(content) => Some(token_for_bytes(&content, len)),
        Err(err) => {
            debug!("no token for {:?}: {err:#}", path);
            None
        }
    }
}
