//! Configuration directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/gh-trigger/`
//! - macOS: `~/Library/Application Support/gh-trigger/`
//! - Windows: `%APPDATA%\gh-trigger\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "gh-trigger";

/// Get the application config directory
/// Returns ~/.config/gh-trigger/ on Linux, ~/Library/Application Support/gh-trigger/ on macOS
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get path to app config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
