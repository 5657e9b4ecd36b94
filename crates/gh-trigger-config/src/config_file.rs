//! Locating the application config file
//!
//! A project-local `.gh-trigger.toml` wins over the per-user config, so a
//! checkout can pin its own jobs file and environment.

use std::{env, path::PathBuf};

const CONFIG_FILE: &str = ".gh-trigger.toml";

/// Load config file content
///
/// Searches in:
/// 1. Current working directory as .gh-trigger.toml
/// 2. The XDG config directory as config.toml
/// 3. Home directory as .gh-trigger.toml
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    // Try current directory first
    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some(content);
    }

    if let Ok(app_config) = crate::paths::app_config_path() {
        if let Ok(content) = std::fs::read_to_string(&app_config) {
            log::debug!("Loaded config from {}", app_config.display());
            return Some(content);
        }
    }

    // Try home directory
    if let Some(home_config) = get_home_config_path() {
        if let Ok(content) = std::fs::read_to_string(&home_config) {
            log::debug!("Loaded config from {}", home_config.display());
            return Some(content);
        }
    }

    None
}

/// Get the path to the config file in the home directory
///
/// Returns ~/.gh-trigger.toml if HOME environment variable is set.
fn get_home_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))
}
