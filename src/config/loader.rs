// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the raw config and the directory its relative paths refer to.
///
/// - An explicit path must exist.
/// - Without one, `Staticver.toml` is used if present; otherwise built-in
///   defaults apply, relative to the current working directory.
pub fn load_or_default(explicit: Option<&Path>) -> Result<(RawConfigFile, PathBuf)> {
    if let Some(path) = explicit {
        let raw = load_from_path(path)?;
        return Ok((raw, config_root_dir(path)));
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        debug!("using config file {:?}", default_path);
        let raw = load_from_path(&default_path)?;
        return Ok((raw, config_root_dir(&default_path)));
    }

    debug!("no config file found; using defaults");
    Ok((RawConfigFile::default(), current_dir()))
}

/// Default config location: `Staticver.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Staticver.toml")
}

/// Directory that relative paths inside `config_path` are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "conf/Staticver.toml"),
///   that directory is used.
/// - For a bare filename we fall back to the current working directory.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => current_dir(),
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
