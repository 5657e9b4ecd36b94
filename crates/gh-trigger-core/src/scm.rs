//! SCM configuration
//!
//! Declared source-control configuration of a job, as loaded from a jobs
//! file or handed over by the orchestration engine.

use crate::branch_spec::BranchSpec;
use serde::{Deserialize, Serialize};

/// One source-control backend configured on a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScmConfig {
    /// Git checkout with branch selectors and remotes
    Git(GitScm),
    /// Subversion checkout
    Subversion { url: String },
    /// Mercurial checkout
    Mercurial { source: String },
}

impl ScmConfig {
    /// Short name of the backend (e.g. "git")
    pub fn kind(&self) -> &'static str {
        match self {
            ScmConfig::Git(_) => "git",
            ScmConfig::Subversion { .. } => "subversion",
            ScmConfig::Mercurial { .. } => "mercurial",
        }
    }

    pub fn as_git(&self) -> Option<&GitScm> {
        match self {
            ScmConfig::Git(git) => Some(git),
            _ => None,
        }
    }
}

/// Git SCM configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitScm {
    /// Branches to build, as configured (e.g. `*/master`)
    #[serde(default)]
    pub branches: Vec<BranchSpec>,

    /// Remote repositories
    #[serde(default, rename = "remotes")]
    pub repositories: Vec<RemoteConfig>,
}

impl GitScm {
    pub fn new(branches: Vec<BranchSpec>, repositories: Vec<RemoteConfig>) -> Self {
        Self {
            branches,
            repositories,
        }
    }
}

/// A named Git remote with one or more URLs (mirrors)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Remote name (default: "origin")
    #[serde(default = "default_remote_name")]
    pub name: String,

    /// Fetch URLs; may contain `${VAR}` references
    #[serde(default)]
    pub urls: Vec<String>,
}

fn default_remote_name() -> String {
    "origin".to_string()
}

impl RemoteConfig {
    pub fn new<I, S>(name: impl Into<String>, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }
}
