//! Subcommand implementations
//!
//! Each command returns its output as a string so it can be tested without
//! capturing stdout.

use crate::process_env::ProcessEnvironmentContributor;
use anyhow::{Context, Result, bail};
use gh_trigger_config::AppConfig;
use gh_trigger_core::{
    ContributorRegistry, CoreEnvironmentContributor, EnvironmentResolver,
    GlobalPropertiesContributor, JobDefinition, JobPropertiesContributor,
    RepositoryBranchAssociation, RepositoryName,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

/// Registry with the SCM contributor and every environment source
///
/// Later sources win: process environment, job name, global properties,
/// then the job's own variables.
pub fn build_registry(config: &AppConfig) -> ContributorRegistry {
    let resolver = EnvironmentResolver::new()
        .with_contributor(ProcessEnvironmentContributor)
        .with_contributor(CoreEnvironmentContributor)
        .with_contributor(GlobalPropertiesContributor::new(config.environment.clone()))
        .with_contributor(JobPropertiesContributor);

    ContributorRegistry::with_defaults(resolver)
}

/// Associations of each job, sorted for stable output
fn resolve_sorted<'a>(
    registry: &ContributorRegistry,
    jobs: impl IntoIterator<Item = &'a JobDefinition>,
) -> Result<BTreeMap<&'a str, BTreeSet<RepositoryBranchAssociation>>> {
    let mut resolved = BTreeMap::new();
    for job in jobs {
        let associations = registry
            .resolve_associations(job)
            .with_context(|| format!("Failed to resolve associations of {}", job.name))?;
        resolved.insert(job.name.as_str(), associations.into_iter().collect());
    }
    Ok(resolved)
}

/// `gh-trigger resolve`
pub fn resolve(
    registry: &ContributorRegistry,
    jobs: &[JobDefinition],
    only: Option<&str>,
    json: bool,
) -> Result<String> {
    let selected: Vec<&JobDefinition> = match only {
        Some(name) => {
            let job = jobs.iter().find(|job| job.name == name);
            match job {
                Some(job) => vec![job],
                None => bail!("No job named {}", name),
            }
        }
        None => jobs.iter().collect(),
    };

    let resolved = resolve_sorted(registry, selected)?;

    if json {
        let mut out = serde_json::to_string_pretty(&resolved)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for (name, associations) in &resolved {
        writeln!(out, "{}", name)?;
        if associations.is_empty() {
            writeln!(out, "  (no associations)")?;
        }
        for association in associations {
            writeln!(
                out,
                "  {} @ {}",
                association.repository_name(),
                association.branch_spec()
            )?;
        }
    }
    Ok(out)
}

/// `gh-trigger match`
pub fn match_push(
    registry: &ContributorRegistry,
    jobs: &[JobDefinition],
    url: &str,
    git_ref: &str,
) -> Result<String> {
    let repository = RepositoryName::parse(url)
        .with_context(|| format!("{} is not a repository URL", url))?;

    let matched = registry.associated_items(jobs, &repository, git_ref)?;
    log::info!(
        "{} of {} jobs are associated with {} {}",
        matched.len(),
        jobs.len(),
        repository,
        git_ref
    );

    let mut out = String::new();
    for job in matched {
        writeln!(out, "{}", job.name)?;
    }
    Ok(out)
}
