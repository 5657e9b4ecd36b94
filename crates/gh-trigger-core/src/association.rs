//! Repository/branch association
//!
//! Uniquely identifies a branch pattern for a given repository, i.e. one
//! (repository, branch) pair a job watches.

use crate::branch_spec::BranchSpec;
use crate::repository::RepositoryName;
use serde::Serialize;
use std::fmt;

/// A (repository, branch pattern) pair a job is considered to watch
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RepositoryBranchAssociation {
    repository_name: RepositoryName,
    branch_spec: BranchSpec,
}

impl RepositoryBranchAssociation {
    pub fn new(repository_name: RepositoryName, branch_spec: BranchSpec) -> Self {
        Self {
            repository_name,
            branch_spec,
        }
    }

    /// Create an association, logging the pair at debug level
    pub fn create(repository_name: RepositoryName, branch_spec: BranchSpec) -> Self {
        log::debug!(
            "Constructing from repository {} and branchSpec {}",
            repository_name,
            branch_spec
        );
        Self::new(repository_name, branch_spec)
    }

    pub fn repository_name(&self) -> &RepositoryName {
        &self.repository_name
    }

    pub fn branch_spec(&self) -> &BranchSpec {
        &self.branch_spec
    }

    /// Check whether a push of `git_ref` to `repository_name` concerns this association
    ///
    /// The branch pattern is only evaluated when the repository matches.
    pub fn matches(&self, repository_name: &RepositoryName, git_ref: &str) -> bool {
        if &self.repository_name != repository_name {
            return false;
        }

        self.branch_spec.matches(git_ref)
    }
}

impl fmt::Display for RepositoryBranchAssociation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RepositoryBranchAssociation[repositoryName={},branchSpec={}]",
            self.repository_name, self.branch_spec
        )
    }
}
