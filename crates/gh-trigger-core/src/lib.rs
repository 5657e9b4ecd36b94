//! Repository/branch association resolver for CI jobs
//!
//! This crate answers one question for the trigger layer of a CI system:
//! which GitHub repositories and branch patterns does a given job watch?
//! A push to `refs/heads/master` of `acme/widgets` should only trigger jobs
//! that have an association matching that repository and ref.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                ContributorRegistry                │
//! │  - resolve_associations(item)                     │
//! │  - is_associated(item, repo, ref)                 │
//! └───────────────────────────────────────────────────┘
//!                         │ dispatch (by ContributorApi)
//!        ┌────────────────┼────────────────┐
//!        ▼                ▼                ▼
//! ┌─────────────┐  ┌─────────────┐  ┌─────────────┐
//! │   FromScm   │  │ Job-era     │  │ Project-era │
//! │ (Item API)  │  │ contributor │  │ contributor │
//! └─────────────┘  └─────────────┘  └─────────────┘
//!        │
//!        ▼
//! ┌─────────────────────┐
//! │ EnvironmentResolver │  JOB_NAME, global and job properties, ...
//! └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use gh_trigger_core::{
//!     ContributorRegistry, EnvironmentResolver, GitScm, JobDefinition, RemoteConfig,
//!     RepositoryName, ScmConfig,
//! };
//!
//! let job = JobDefinition::new("widgets-ci").with_scm(ScmConfig::Git(GitScm::new(
//!     vec!["*/master".parse()?],
//!     vec![RemoteConfig::new("origin", ["https://github.com/acme/widgets.git"])],
//! )));
//!
//! let registry = ContributorRegistry::with_defaults(EnvironmentResolver::with_defaults());
//! let associations = registry.resolve_associations(&job)?;
//!
//! let repo = RepositoryName::parse("git@github.com:acme/widgets.git").unwrap();
//! assert!(associations.iter().any(|a| a.matches(&repo, "refs/heads/master")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod association;
pub mod branch_spec;
pub mod contributor;
pub mod env;
pub mod error;
pub mod from_scm;
pub mod item;
pub mod job;
pub mod registry;
pub mod repository;
pub mod scm;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use association::RepositoryBranchAssociation;
pub use branch_spec::{BranchSpec, BranchSpecError};
pub use contributor::{dispatch, AssociationContributor, ContributorApi};
pub use env::{
    CoreEnvironmentContributor, EnvVars, EnvironmentContributor, EnvironmentReport,
    EnvironmentResolver, GlobalPropertiesContributor, JobPropertiesContributor, ProviderFailure,
};
pub use error::AssociationError;
pub use from_scm::{normalize_branch_specs, FromScm};
pub use item::{Item, ItemKind, Job, Project, ScmTriggerItem};
pub use job::JobDefinition;
pub use registry::ContributorRegistry;
pub use repository::RepositoryName;
pub use scm::{GitScm, RemoteConfig, ScmConfig};
