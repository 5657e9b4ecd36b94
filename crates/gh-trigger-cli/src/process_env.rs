//! Process environment as an environment contributor
//!
//! Makes variables exported in the shell (or loaded from `.env`) available
//! when remote URLs are expanded.

use gh_trigger_core::{EnvVars, EnvironmentContributor, Job};

/// Copies the variables of the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironmentContributor;

impl EnvironmentContributor for ProcessEnvironmentContributor {
    fn name(&self) -> &str {
        "process"
    }

    fn build_environment_for(&self, _job: Job<'_>, env: &mut EnvVars) -> anyhow::Result<()> {
        // Non UTF-8 variables cannot appear in a URL template
        env.extend(std::env::vars_os().filter_map(|(name, value)| {
            Some((name.into_string().ok()?, value.into_string().ok()?))
        }));
        Ok(())
    }
}
