//! Jobs file loading
//!
//! A jobs file is a TOML document with a `[[jobs]]` array:
//!
//! ```toml
//! [[jobs]]
//! name = "widgets-ci"
//!
//! [[jobs.scm]]
//! type = "git"
//! branches = ["*/master", "develop"]
//!
//! [[jobs.scm.remotes]]
//! urls = ["https://github.com/acme/widgets.git"]
//! ```

use anyhow::{Context, Result};
use gh_trigger_core::JobDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Contents of a jobs file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobsFile {
    #[serde(default)]
    pub jobs: Vec<JobDefinition>,
}

/// Parse jobs from TOML content
pub fn parse_jobs(content: &str) -> Result<Vec<JobDefinition>> {
    let file: JobsFile = toml::from_str(content).context("Failed to parse jobs file")?;

    let mut seen = HashSet::new();
    for job in &file.jobs {
        if !seen.insert(job.name.as_str()) {
            log::warn!("Job {} is declared more than once", job.name);
        }
    }

    Ok(file.jobs)
}

/// Load jobs from a TOML file
pub fn load_jobs(path: &Path) -> Result<Vec<JobDefinition>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read jobs file: {:?}", path))?;
    let jobs = parse_jobs(&content).with_context(|| format!("Invalid jobs file: {:?}", path))?;
    log::info!("Loaded {} jobs from {:?}", jobs.len(), path);
    Ok(jobs)
}
