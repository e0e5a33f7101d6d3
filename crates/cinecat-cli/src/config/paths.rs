//! Config directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolves the config directory.
///
/// - If `dir` is `Some`, returns it as is.
/// - Otherwise returns `~/.config/cinecat`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_dir(dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.to_path_buf());
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home).join(".config").join("cinecat"))
}

/// Resolves the config file path (`{config dir}/config.toml`).
///
/// # Errors
///
/// Returns an error if the config directory cannot be resolved.
pub fn resolve_config_path(dir: Option<&Path>) -> Result<PathBuf> {
    resolve_config_dir(dir).map(|d| d.join("config.toml"))
}

/// Resolves the browser log file path (`{config dir}/cinecat.log`).
///
/// # Errors
///
/// Returns an error if the config directory cannot be resolved.
pub fn resolve_log_path(dir: Option<&Path>) -> Result<PathBuf> {
    resolve_config_dir(dir).map(|d| d.join("cinecat.log"))
}
