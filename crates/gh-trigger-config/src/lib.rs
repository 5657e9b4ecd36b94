//! Configuration and file management for gh-trigger
//!
//! This crate provides:
//! - File path utilities for config files
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)
//! - Jobs file loading

pub mod app_config;
pub mod config_file;
pub mod jobs;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
pub use jobs::{load_jobs, parse_jobs, JobsFile};
pub use paths::{app_config_path, config_dir};
