//! Association contributors
//!
//! An [`AssociationContributor`] inspects an item and emits the
//! repository/branch associations it knows about. The protocol went through
//! three generations, each accepting a wider item shape:
//!
//! | API                      | Receives     | Method                    |
//! |--------------------------|--------------|---------------------------|
//! | [`ContributorApi::Project`] | [`Project`] | `contribute_for_project`  |
//! | [`ContributorApi::Job`]     | [`Job`]     | `contribute_for_job`      |
//! | [`ContributorApi::Item`]    | any [`Item`]| `contribute_for_item`     |
//!
//! A contributor declares the generation it implements through
//! [`AssociationContributor::api`], and [`dispatch`] routes every item to the
//! matching method. Older contributors are simply skipped for items they
//! cannot handle.

use crate::association::RepositoryBranchAssociation;
use crate::error::AssociationError;
use crate::item::{Item, Job, Project};
use anyhow::anyhow;

/// API generation a contributor implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributorApi {
    /// Oldest API, only ever sees classic projects
    Project,
    /// Intermediate API, sees every job
    Job,
    /// Current API, sees every item
    Item,
}

/// Extension point that associates repository/branch pairs to an item
///
/// Implement [`contribute_for_item`](Self::contribute_for_item) and return
/// `Some(ContributorApi::Item)` from [`api`](Self::api). The narrower
/// methods only exist so that contributors written against the older API
/// keep working.
pub trait AssociationContributor: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// The API generation this contributor implements, `None` if it implements none
    fn api(&self) -> Option<ContributorApi>;

    /// Associations for any item
    fn contribute_for_item(
        &self,
        _item: &dyn Item,
    ) -> anyhow::Result<Vec<RepositoryBranchAssociation>> {
        Err(anyhow!("{} does not implement contribute_for_item", self.name()))
    }

    /// Associations for a job
    #[deprecated(note = "implement contribute_for_item with ContributorApi::Item")]
    fn contribute_for_job(&self, _job: Job<'_>) -> anyhow::Result<Vec<RepositoryBranchAssociation>> {
        Err(anyhow!("{} does not implement contribute_for_job", self.name()))
    }

    /// Associations for a classic project
    #[deprecated(note = "implement contribute_for_item with ContributorApi::Item")]
    fn contribute_for_project(
        &self,
        _project: Project<'_>,
    ) -> anyhow::Result<Vec<RepositoryBranchAssociation>> {
        Err(anyhow!("{} does not implement contribute_for_project", self.name()))
    }
}

/// Ask `contributor` for the associations of `item` using the API it implements
///
/// A legacy contributor that cannot handle the item's kind contributes
/// nothing. A contributor without any API is a programming error and fails
/// with [`AssociationError::Unimplemented`].
#[allow(deprecated)]
pub fn dispatch(
    contributor: &dyn AssociationContributor,
    item: &dyn Item,
) -> Result<Vec<RepositoryBranchAssociation>, AssociationError> {
    let result = match contributor.api() {
        Some(ContributorApi::Item) => contributor.contribute_for_item(item),
        Some(ContributorApi::Job) => match Job::from_item(item) {
            Some(job) => contributor.contribute_for_job(job),
            None => {
                log::trace!(
                    "{} only handles jobs, skipping {}",
                    contributor.name(),
                    item.full_name()
                );
                return Ok(Vec::new());
            }
        },
        Some(ContributorApi::Project) => match Project::from_item(item) {
            Some(project) => contributor.contribute_for_project(project),
            None => {
                log::trace!(
                    "{} only handles projects, skipping {}",
                    contributor.name(),
                    item.full_name()
                );
                return Ok(Vec::new());
            }
        },
        None => {
            return Err(AssociationError::Unimplemented {
                contributor: contributor.name().to_string(),
            })
        }
    };

    result.map_err(|source| AssociationError::Contributor {
        contributor: contributor.name().to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;
    use crate::branch_spec::BranchSpec;
    use crate::item::ItemKind;
    use crate::job::JobDefinition;
    use crate::repository::RepositoryName;
    use anyhow::bail;

    fn association(branch: &str) -> RepositoryBranchAssociation {
        RepositoryBranchAssociation::new(
            RepositoryName::new("github.com", "acme", "widgets"),
            BranchSpec::new(branch).unwrap(),
        )
    }

    struct ProjectEra;

    impl AssociationContributor for ProjectEra {
        fn api(&self) -> Option<ContributorApi> {
            Some(ContributorApi::Project)
        }

        fn contribute_for_project(
            &self,
            _project: Project<'_>,
        ) -> anyhow::Result<Vec<RepositoryBranchAssociation>> {
            Ok(vec![association("project")])
        }
    }

    struct JobEra;

    impl AssociationContributor for JobEra {
        fn api(&self) -> Option<ContributorApi> {
            Some(ContributorApi::Job)
        }

        fn contribute_for_job(&self, _job: Job<'_>) -> anyhow::Result<Vec<RepositoryBranchAssociation>> {
            Ok(vec![association("job")])
        }
    }

    struct ItemEra;

    impl AssociationContributor for ItemEra {
        fn api(&self) -> Option<ContributorApi> {
            Some(ContributorApi::Item)
        }

        fn contribute_for_item(
            &self,
            _item: &dyn Item,
        ) -> anyhow::Result<Vec<RepositoryBranchAssociation>> {
            Ok(vec![association("item")])
        }
    }

    struct NoApi;

    impl AssociationContributor for NoApi {
        fn name(&self) -> &str {
            "no-api"
        }

        fn api(&self) -> Option<ContributorApi> {
            None
        }
    }

    struct Broken;

    impl AssociationContributor for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn api(&self) -> Option<ContributorApi> {
            Some(ContributorApi::Item)
        }

        fn contribute_for_item(
            &self,
            _item: &dyn Item,
        ) -> anyhow::Result<Vec<RepositoryBranchAssociation>> {
            bail!("lookup failed")
        }
    }

    #[test]
    fn test_project_era_handles_projects() {
        let project = JobDefinition::new("widgets").with_kind(ItemKind::Project);
        assert_eq!(
            dispatch(&ProjectEra, &project).unwrap(),
            vec![association("project")]
        );
    }

    #[test]
    fn test_project_era_skips_other_kinds() {
        for kind in [ItemKind::Job, ItemKind::Other] {
            let item = JobDefinition::new("widgets").with_kind(kind);
            assert!(dispatch(&ProjectEra, &item).unwrap().is_empty());
        }
    }

    #[test]
    fn test_job_era_handles_jobs_and_projects() {
        for kind in [ItemKind::Job, ItemKind::Project] {
            let job = JobDefinition::new("widgets").with_kind(kind);
            assert_eq!(dispatch(&JobEra, &job).unwrap(), vec![association("job")]);
        }
    }

    #[test]
    fn test_job_era_skips_non_jobs() {
        let folder = JobDefinition::new("team").with_kind(ItemKind::Other);
        assert!(dispatch(&JobEra, &folder).unwrap().is_empty());
    }

    #[test]
    fn test_item_era_sees_everything() {
        for kind in [ItemKind::Project, ItemKind::Job, ItemKind::Other] {
            let item = JobDefinition::new("widgets").with_kind(kind);
            assert_eq!(dispatch(&ItemEra, &item).unwrap(), vec![association("item")]);
        }
    }

    #[test]
    fn test_missing_api_is_fatal() {
        let job = JobDefinition::new("widgets");
        let err = dispatch(&NoApi, &job).unwrap_err();
        assert!(matches!(
            err,
            AssociationError::Unimplemented { ref contributor } if contributor == "no-api"
        ));
    }

    #[test]
    fn test_contributor_error_is_propagated() {
        let job = JobDefinition::new("widgets");
        let err = dispatch(&Broken, &job).unwrap_err();
        assert_eq!(err.to_string(), "Contributor broken failed: lookup failed");
    }

    struct DeclaresJobOnly;

    impl AssociationContributor for DeclaresJobOnly {
        fn name(&self) -> &str {
            "declares-job-only"
        }

        fn api(&self) -> Option<ContributorApi> {
            Some(ContributorApi::Job)
        }
    }

    #[test]
    fn test_declared_api_without_method_fails() {
        let job = JobDefinition::new("widgets").with_kind(ItemKind::Job);
        let err = dispatch(&DeclaresJobOnly, &job).unwrap_err();
        assert!(matches!(err, AssociationError::Contributor { .. }));
        assert_eq!(
            err.to_string(),
            "Contributor declares-job-only failed: declares-job-only does not implement contribute_for_job"
        );
    }

    #[test]
    fn test_default_name_is_type_name() {
        assert!(ItemEra.name().ends_with("ItemEra"));
    }
}
