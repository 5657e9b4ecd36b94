//! Default contributor that looks at a job's SCMs
//!
//! Every Git SCM contributes the cross product of its remote repositories
//! and its branch patterns. Remote URLs are expanded with the job's
//! environment before they are parsed.

use crate::association::RepositoryBranchAssociation;
use crate::branch_spec::BranchSpec;
use crate::contributor::{AssociationContributor, ContributorApi};
use crate::env::{EnvVars, EnvironmentResolver};
use crate::item::{Item, Job};
use crate::repository::RepositoryName;
use crate::scm::{GitScm, ScmConfig};
use regex::Regex;
use std::sync::OnceLock;

/// Derives associations from the Git SCMs configured on an item
#[derive(Debug, Clone, Default)]
pub struct FromScm {
    resolver: EnvironmentResolver,
}

impl FromScm {
    pub fn new(resolver: EnvironmentResolver) -> Self {
        Self { resolver }
    }

    /// Effective environment of a job; failing contributors are logged and skipped
    fn build_env(&self, job: Job<'_>) -> EnvVars {
        let report = self.resolver.resolve(job);
        for failure in &report.failures {
            log::debug!(
                "{} failed to build env for {} ({}), skipping",
                failure.provider,
                job.full_name(),
                failure.error
            );
        }
        report.env
    }

    fn add_branch_specs(
        git: &GitScm,
        env: &EnvVars,
        result: &mut Vec<RepositoryBranchAssociation>,
    ) {
        let branch_specs = normalize_branch_specs(&git.branches);

        for remote in &git.repositories {
            for uri in &remote.urls {
                // expanded URLs may carry credentials, only the configured text is logged
                let Some(repo) = RepositoryName::parse(&env.expand(uri)) else {
                    log::debug!("Skipping {} of remote {}: not a repository URL", uri, remote.name);
                    continue;
                };

                for branch_spec in &branch_specs {
                    result.push(RepositoryBranchAssociation::create(
                        repo.clone(),
                        branch_spec.clone(),
                    ));
                }
            }
        }
    }
}

impl AssociationContributor for FromScm {
    fn name(&self) -> &str {
        "from-scm"
    }

    fn api(&self) -> Option<ContributorApi> {
        Some(ContributorApi::Item)
    }

    fn contribute_for_item(
        &self,
        item: &dyn Item,
    ) -> anyhow::Result<Vec<RepositoryBranchAssociation>> {
        let Some(trigger_item) = item.as_scm_trigger_item() else {
            return Ok(Vec::new());
        };

        let env = match Job::from_item(item) {
            Some(job) => self.build_env(job),
            None => EnvVars::new(),
        };

        let mut result = Vec::new();
        for scm in trigger_item.scms() {
            match scm {
                ScmConfig::Git(git) => Self::add_branch_specs(git, &env, &mut result),
                other => log::trace!("Ignoring {} SCM of {}", other.kind(), item.full_name()),
            }
        }
        Ok(result)
    }
}

/// Strip a leading `*/` (or `**/`, ...) from every branch pattern
///
/// The default `*/master` only matches remote-tracking names such as
/// `origin/master`, never the `refs/heads/master` of a push event, so the
/// wildcard remote segment is dropped. Only a leading run is stripped:
/// `feature/*/test` is left alone.
pub fn normalize_branch_specs(branches: &[BranchSpec]) -> Vec<BranchSpec> {
    static LEADING_WILDCARD_REGEX: OnceLock<Regex> = OnceLock::new();

    let re = LEADING_WILDCARD_REGEX.get_or_init(|| Regex::new(r"^\*+/").unwrap());

    branches
        .iter()
        .filter_map(|original| {
            let name = re.replace(original.name(), "");
            match BranchSpec::new(name) {
                Ok(spec) => Some(spec),
                Err(e) => {
                    log::warn!("Ignoring branch spec {}: {}", original, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{CoreEnvironmentContributor, EnvironmentContributor, JobPropertiesContributor};
    use crate::item::ItemKind;
    use crate::job::JobDefinition;
    use crate::scm::RemoteConfig;
    use anyhow::bail;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn specs(names: &[&str]) -> Vec<BranchSpec> {
        names.iter().map(|n| BranchSpec::new(n).unwrap()).collect()
    }

    fn names(specs: &[BranchSpec]) -> Vec<&str> {
        specs.iter().map(BranchSpec::name).collect()
    }

    fn git_job(urls: &[&str], branches: &[&str]) -> JobDefinition {
        JobDefinition::new("widgets-ci").with_scm(ScmConfig::Git(GitScm::new(
            specs(branches),
            vec![RemoteConfig::new("origin", urls.iter().copied())],
        )))
    }

    fn pairs(associations: Vec<RepositoryBranchAssociation>) -> BTreeSet<(String, String)> {
        associations
            .iter()
            .map(|a| (a.repository_name().to_string(), a.branch_spec().to_string()))
            .collect()
    }

    fn pair(repo: &str, branch: &str) -> (String, String) {
        (repo.to_string(), branch.to_string())
    }

    #[test]
    fn test_normalize_strips_leading_wildcard_segment() {
        let normalized = normalize_branch_specs(&specs(&[
            "*/master",
            "*/feature/*",
            "release/1.0",
            "**/hotfix",
            "feature/*/test",
        ]));
        assert_eq!(
            names(&normalized),
            vec!["master", "feature/*", "release/1.0", "hotfix", "feature/*/test"]
        );
    }

    #[test]
    fn test_normalize_bare_wildcard_segment_matches_all() {
        let normalized = normalize_branch_specs(&specs(&["*/"]));
        assert_eq!(names(&normalized), vec!["**"]);
    }

    #[test]
    fn test_normalized_spec_matches_pushed_ref() {
        let normalized = normalize_branch_specs(&specs(&["*/master"]));
        assert!(normalized[0].matches("refs/heads/master"));
    }

    #[test]
    fn test_git_scm_crosses_repositories_and_branches() {
        let job = git_job(&["https://github.com/acme/widgets.git"], &["*/master", "develop"]);
        let result = FromScm::default().contribute_for_item(&job).unwrap();
        assert_eq!(
            pairs(result),
            BTreeSet::from([pair("acme/widgets", "develop"), pair("acme/widgets", "master")])
        );
    }

    #[test]
    fn test_remote_url_is_expanded() {
        let job = git_job(&["https://github.com/${ORG}/widgets.git"], &["*/master"])
            .with_env("ORG", "acme");
        let contributor = FromScm::new(EnvironmentResolver::new().with_contributor(JobPropertiesContributor));
        let result = contributor.contribute_for_item(&job).unwrap();
        assert_eq!(pairs(result), BTreeSet::from([pair("acme/widgets", "master")]));
    }

    #[test]
    fn test_job_name_variable_is_available() {
        let job = JobDefinition::new("widgets").with_scm(ScmConfig::Git(GitScm::new(
            specs(&["main"]),
            vec![RemoteConfig::new("origin", ["git@github.com:acme/${JOB_BASE_NAME}.git"])],
        )));
        let contributor = FromScm::new(EnvironmentResolver::new().with_contributor(CoreEnvironmentContributor));
        let result = contributor.contribute_for_item(&job).unwrap();
        assert_eq!(pairs(result), BTreeSet::from([pair("acme/widgets", "main")]));
    }

    #[test]
    fn test_non_job_items_get_no_environment() {
        let folder = git_job(&["https://github.com/${ORG}/widgets.git"], &["main"])
            .with_env("ORG", "acme")
            .with_kind(ItemKind::Other);
        let result = FromScm::new(EnvironmentResolver::with_defaults())
            .contribute_for_item(&folder)
            .unwrap();
        assert_eq!(pairs(result), BTreeSet::from([pair("${ORG}/widgets", "main")]));
    }

    #[test]
    fn test_unparsable_urls_are_skipped() {
        let job = git_job(
            &["/srv/git/widgets.git", "https://github.com/acme/widgets.git"],
            &["main"],
        );
        let result = FromScm::default().contribute_for_item(&job).unwrap();
        assert_eq!(pairs(result), BTreeSet::from([pair("acme/widgets", "main")]));
    }

    #[test]
    fn test_mirrors_contribute_one_identity_each() {
        let job = git_job(
            &[
                "https://github.com/acme/widgets.git",
                "git@github.com:acme/widgets.git",
                "https://ghe.example.com/acme/widgets.git",
            ],
            &["main"],
        );
        let result = FromScm::default().contribute_for_item(&job).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(
            pairs(result),
            BTreeSet::from([
                pair("acme/widgets", "main"),
                pair("ghe.example.com:acme/widgets", "main"),
            ])
        );
    }

    #[test]
    fn test_unparsable_expanded_url_is_skipped() {
        let job = git_job(&["${CHECKOUT_DIR}/widgets.git"], &["main"])
            .with_env("CHECKOUT_DIR", "https://user:secret@/srv/git");
        let contributor = FromScm::new(EnvironmentResolver::new().with_contributor(JobPropertiesContributor));
        assert!(contributor.contribute_for_item(&job).unwrap().is_empty());
    }

    #[test]
    fn test_git_scm_without_branches_contributes_nothing() {
        let job = git_job(&["https://github.com/acme/widgets.git"], &[]);
        assert!(FromScm::default().contribute_for_item(&job).unwrap().is_empty());
    }

    #[test]
    fn test_non_git_scm_contributes_nothing() {
        let job = JobDefinition::new("legacy").with_scm(ScmConfig::Subversion {
            url: "svn://svn.example.com/widgets/trunk".to_string(),
        });
        assert!(FromScm::default().contribute_for_item(&job).unwrap().is_empty());
    }

    #[test]
    fn test_item_without_trigger_facet_contributes_nothing() {
        let job = git_job(&["https://github.com/acme/widgets.git"], &["main"])
            .with_triggers_on_push(false);
        assert!(FromScm::default().contribute_for_item(&job).unwrap().is_empty());
    }

    #[test]
    fn test_failing_env_contributor_is_tolerated() {
        struct Offline;

        impl EnvironmentContributor for Offline {
            fn build_environment_for(&self, _job: Job<'_>, _env: &mut EnvVars) -> anyhow::Result<()> {
                bail!("agent offline")
            }
        }

        let job = git_job(&["https://github.com/${ORG}/widgets.git"], &["main"])
            .with_env("ORG", "acme");
        let resolver = EnvironmentResolver::new()
            .with_contributor(Offline)
            .with_contributor(JobPropertiesContributor);
        let result = FromScm::new(resolver).contribute_for_item(&job).unwrap();
        assert_eq!(pairs(result), BTreeSet::from([pair("acme/widgets", "main")]));
    }
}
