//! Environment resolution
//!
//! Remote URLs in SCM configuration may reference variables, e.g.
//! `https://github.com/${ORG}/widgets.git`. Before a URL can be turned into
//! a repository identity the job's effective environment is built by running
//! every registered [`EnvironmentContributor`], then the URL is expanded.
//!
//! Contributors are isolated from each other: a failing contributor is
//! recorded in the [`EnvironmentReport`] and the remaining ones still run.

use crate::item::Job;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Ordered mapping of environment variable names to values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: BTreeMap<String, String>,
}

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Expand `${NAME}` and `$NAME` references in `template`
    ///
    /// Undefined variables are left untouched and `$$` yields a literal `$`.
    pub fn expand(&self, template: &str) -> String {
        static REFERENCE_REGEX: OnceLock<Regex> = OnceLock::new();

        if !template.contains('$') {
            return template.to_string();
        }

        let re = REFERENCE_REGEX.get_or_init(|| {
            Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_.]*)\}|([A-Za-z_][A-Za-z0-9_]*)|\$)").unwrap()
        });

        re.replace_all(template, |caps: &Captures| {
            match caps.get(1).or_else(|| caps.get(2)) {
                Some(name) => match self.get(name.as_str()) {
                    Some(value) => value.to_string(),
                    None => caps[0].to_string(),
                },
                None => "$".to_string(),
            }
        })
        .into_owned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut env = EnvVars::new();
        env.extend(iter);
        env
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for EnvVars {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// Contributes environment variables for a job
///
/// Implementations must be `Send + Sync` so a resolver can be shared
/// between threads.
pub trait EnvironmentContributor: Send + Sync {
    /// Name used when reporting failures
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Add variables for `job` to `env`
    ///
    /// Variables written before an error is returned are kept.
    fn build_environment_for(&self, job: Job<'_>, env: &mut EnvVars) -> anyhow::Result<()>;
}

/// A contributor that failed while building the environment
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: anyhow::Error,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed to build env ({})", self.provider, self.error)
    }
}

/// Outcome of running all environment contributors for a job
#[derive(Debug, Default)]
pub struct EnvironmentReport {
    pub env: EnvVars,
    pub failures: Vec<ProviderFailure>,
}

impl EnvironmentReport {
    /// True if every contributor succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs environment contributors in registration order
#[derive(Clone, Default)]
pub struct EnvironmentResolver {
    contributors: Vec<Arc<dyn EnvironmentContributor>>,
}

impl EnvironmentResolver {
    /// Resolver without any contributors
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with the built-in job name and job property contributors
    pub fn with_defaults() -> Self {
        Self::new()
            .with_contributor(CoreEnvironmentContributor)
            .with_contributor(JobPropertiesContributor)
    }

    pub fn with_contributor(mut self, contributor: impl EnvironmentContributor + 'static) -> Self {
        self.contributors.push(Arc::new(contributor));
        self
    }

    pub fn register(&mut self, contributor: Arc<dyn EnvironmentContributor>) {
        self.contributors.push(contributor);
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }

    /// Build the effective environment for `job`
    pub fn resolve(&self, job: Job<'_>) -> EnvironmentReport {
        let mut report = EnvironmentReport::default();

        for contributor in &self.contributors {
            if let Err(error) = contributor.build_environment_for(job, &mut report.env) {
                report.failures.push(ProviderFailure {
                    provider: contributor.name().to_string(),
                    error,
                });
            }
        }

        log::trace!(
            "Resolved {} variables for {} ({} failures)",
            report.env.len(),
            job.full_name(),
            report.failures.len()
        );
        report
    }
}

impl fmt::Debug for EnvironmentResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.contributors.iter().map(|c| c.name()))
            .finish()
    }
}

/// Provides `JOB_NAME` and `JOB_BASE_NAME`
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreEnvironmentContributor;

impl EnvironmentContributor for CoreEnvironmentContributor {
    fn name(&self) -> &str {
        "core"
    }

    fn build_environment_for(&self, job: Job<'_>, env: &mut EnvVars) -> anyhow::Result<()> {
        env.insert("JOB_NAME", job.full_name());
        env.insert("JOB_BASE_NAME", job.base_name());
        Ok(())
    }
}

/// Provides the same static variables to every job
#[derive(Debug, Clone, Default)]
pub struct GlobalPropertiesContributor {
    properties: BTreeMap<String, String>,
}

impl GlobalPropertiesContributor {
    pub fn new(properties: BTreeMap<String, String>) -> Self {
        Self { properties }
    }
}

impl EnvironmentContributor for GlobalPropertiesContributor {
    fn name(&self) -> &str {
        "global-properties"
    }

    fn build_environment_for(&self, _job: Job<'_>, env: &mut EnvVars) -> anyhow::Result<()> {
        env.extend(self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Ok(())
    }
}

/// Provides the variables declared on the job itself
#[derive(Debug, Clone, Copy, Default)]
pub struct JobPropertiesContributor;

impl EnvironmentContributor for JobPropertiesContributor {
    fn name(&self) -> &str {
        "job-properties"
    }

    fn build_environment_for(&self, job: Job<'_>, env: &mut EnvVars) -> anyhow::Result<()> {
        if let Some(declared) = job.item().declared_environment() {
            env.extend(declared.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(())
    }
}
