//! Contributor registry
//!
//! Holds the contributors of a running system and answers the one query the
//! trigger layer needs: the deduplicated associations of an item.

use crate::association::RepositoryBranchAssociation;
use crate::contributor::{dispatch, AssociationContributor};
use crate::env::EnvironmentResolver;
use crate::error::AssociationError;
use crate::from_scm::FromScm;
use crate::item::Item;
use crate::repository::RepositoryName;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Ordered collection of association contributors
#[derive(Clone, Default)]
pub struct ContributorRegistry {
    contributors: Vec<Arc<dyn AssociationContributor>>,
}

impl ContributorRegistry {
    /// Registry without any contributors
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the SCM-based contributor, using `resolver` for URL expansion
    pub fn with_defaults(resolver: EnvironmentResolver) -> Self {
        Self::new().with_contributor(FromScm::new(resolver))
    }

    pub fn with_contributor(mut self, contributor: impl AssociationContributor + 'static) -> Self {
        self.contributors.push(Arc::new(contributor));
        self
    }

    pub fn register(&mut self, contributor: Arc<dyn AssociationContributor>) {
        self.contributors.push(contributor);
    }

    pub fn contributors(&self) -> impl Iterator<Item = &dyn AssociationContributor> {
        self.contributors.iter().map(|c| c.as_ref())
    }

    /// Collect the associations of `item` from every contributor
    ///
    /// Contributors run in registration order. Identical associations from
    /// different contributors (or different mirrors) collapse into one entry.
    /// The first contributor error aborts the query.
    pub fn resolve_associations(
        &self,
        item: &dyn Item,
    ) -> Result<HashSet<RepositoryBranchAssociation>, AssociationError> {
        let mut associations = HashSet::new();
        for contributor in &self.contributors {
            let contributed = dispatch(contributor.as_ref(), item)?;
            log::trace!(
                "{} contributed {} associations for {}",
                contributor.name(),
                contributed.len(),
                item.full_name()
            );
            associations.extend(contributed);
        }

        log::debug!(
            "Resolved {} associations for {}",
            associations.len(),
            item.full_name()
        );
        Ok(associations)
    }

    /// Check whether a push of `git_ref` to `repository_name` concerns `item`
    pub fn is_associated(
        &self,
        item: &dyn Item,
        repository_name: &RepositoryName,
        git_ref: &str,
    ) -> Result<bool, AssociationError> {
        Ok(self
            .resolve_associations(item)?
            .iter()
            .any(|association| association.matches(repository_name, git_ref)))
    }

    /// Items out of `items` that a push of `git_ref` to `repository_name` concerns
    pub fn associated_items<'a, I>(
        &self,
        items: &'a [I],
        repository_name: &RepositoryName,
        git_ref: &str,
    ) -> Result<Vec<&'a I>, AssociationError>
    where
        I: Item,
    {
        let mut matched = Vec::new();
        for item in items {
            if self.is_associated(item, repository_name, git_ref)? {
                matched.push(item);
            }
        }
        Ok(matched)
    }
}

impl fmt::Debug for ContributorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.contributors.iter().map(|c| c.name()))
            .finish()
    }
}
