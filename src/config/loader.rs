// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::{DeskError, Result};

/// Read and deserialize a job source without semantic validation.
///
/// Unreadable files and TOML errors both surface as `ConfigError`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJobFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        DeskError::ConfigError(format!("failed to read {}: {e}", path.display()))
    })?;

    parse_str(&contents)
        .map_err(|e| DeskError::ConfigError(format!("{}: {e}", path.display())))
}

pub fn parse_str(contents: &str) -> std::result::Result<RawJobFile, toml::de::Error> {
    toml::from_str(contents)
}

/// Load a job source and validate it.
///
/// - Reads TOML.
/// - Rejects an empty job list, empty or duplicate names, empty commands and
///   bad intervals.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<JobFile> {
    let raw = load_from_path(&path)?;
    JobFile::try_from(raw)
}

/// `$XDG_CONFIG_HOME/hypr/cron.toml`, or `./cron.toml` when no config
/// directory can be determined.
pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("hypr").join("cron.toml"),
        None => PathBuf::from("cron.toml"),
    }
}
