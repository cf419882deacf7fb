// src/lib.rs

pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod version;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

pub use crate::cache::{CacheSettings, VersionCache};
use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile, RawConfigFile};
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - prewarm
/// - (unless `--list`) the background watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = settings_from_args(&args)?;

    if args.list {
        let cache = VersionCache::prewarmed(settings, Arc::new(RealFileSystem));
        for (path, token) in cache.store().snapshot() {
            println!("{path} {token}");
        }
        return Ok(());
    }

    let mut cache = VersionCache::init(settings);
    if cache.is_watching() {
        info!(
            entries = cache.store().len(),
            "static version cache ready; press Ctrl-C to stop"
        );
    } else {
        warn!("static version cache is not watching for changes");
    }

    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received; shutting down");
    cache.shutdown().await;
    Ok(())
}

/// Resolve the effective settings: config file (or defaults), then CLI
/// overrides, then validation.
pub fn settings_from_args(args: &CliArgs) -> Result<CacheSettings> {
    let explicit = args.config.as_deref().map(Path::new);
    let (raw, base_dir) = load_or_default(explicit)?;
    let raw = apply_overrides(raw, args);
    let cfg = ConfigFile::try_from(raw)?;
    Ok(cfg.settings(&base_dir))
}

fn apply_overrides(mut raw: RawConfigFile, args: &CliArgs) -> RawConfigFile {
    if let Some(ref root) = args.root {
        // CLI paths are relative to where the command runs, not the config.
        let root = PathBuf::from(root);
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&root))
                .unwrap_or(root)
        };
        raw.cache.root = root.to_string_lossy().into_owned();
    }
    for name in args.ignore.iter() {
        if !raw.cache.ignore.contains(name) {
            raw.cache.ignore.push(name.clone());
        }
    }
    if let Some(len) = args.token_len {
        raw.cache.token_len = len;
    }
    raw
}
