//! Application configuration
//!
//! Configuration loaded from .gh-trigger.toml file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Application configuration loaded from .gh-trigger.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Jobs file used when none is given on the command line
    #[serde(default = "default_jobs_file")]
    pub jobs_file: String,

    /// Global properties made available to every job when expanding remote URLs
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

fn default_jobs_file() -> String {
    "gh-trigger.jobs.toml".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jobs_file: default_jobs_file(),
            environment: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then config dir, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }
}
