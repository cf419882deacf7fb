// src/version/mod.rs

//! Version tokens for static assets.
//!
//! - [`hash`] turns file content into a short token.
//! - [`ignore`] holds the base names that never get a token.
//! - [`store`] is the shared, lock-guarded token map with lazy fill and
//!   bulk prewarm.

pub mod hash;
pub mod ignore;
pub mod path_utils;
pub mod store;

pub use hash::{compute_token, token_for_bytes, DEFAULT_TOKEN_LEN, MAX_TOKEN_LEN};
pub use ignore::IgnoreSet;
pub use path_utils::{normalize_key, relative_str};
pub use store::VersionStore;
