// src/config/validate.rs

use crate::config::model::{CacheSection, ConfigFile, RawConfigFile};
use crate::errors::{Result, StaticverError};
use crate::version::MAX_TOKEN_LEN;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::StaticverError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_cache_section(&raw.cache)?;
        Ok(ConfigFile::new_unchecked(raw.cache))
    }
}

fn validate_cache_section(cache: &CacheSection) -> Result<()> {
    if cache.root.trim().is_empty() {
        return Err(StaticverError::ConfigError(
            "[cache].root must not be empty".to_string(),
        ));
    }

    if cache.token_len == 0 || cache.token_len > MAX_TOKEN_LEN {
        return Err(StaticverError::ConfigError(format!(
            "[cache].token_len must be between 1 and {MAX_TOKEN_LEN} (got {})",
            cache.token_len
        )));
    }

    for name in cache.ignore.iter() {
        validate_ignore_name(name)?;
    }

    Ok(())
}

/// Ignore entries are matched against base names, so a path can never match.
fn validate_ignore_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StaticverError::ConfigError(
            "[cache].ignore entries must not be empty".to_string(),
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(StaticverError::ConfigError(format!(
            "[cache].ignore entry '{name}' must be a file name, not a path"
        )));
    }
    if name == "." || name == ".." {
        return Err(StaticverError::ConfigError(format!(
            "[cache].ignore entry '{name}' is not a file name"
        )));
    }
    Ok(())
}
