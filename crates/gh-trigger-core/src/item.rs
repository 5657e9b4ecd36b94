//! Item model
//!
//! The orchestration engine owns its jobs; this crate only sees them through
//! the [`Item`] trait. Items come in three nested kinds: every project is a
//! job and every job is an item. [`Job`] and [`Project`] are typed views that
//! can only be obtained from an item of the matching kind, which is what lets
//! older contributors keep their narrower signatures.

use crate::scm::ScmConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of an item, from most to least specific
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A classic build project (also a job)
    #[default]
    Project,
    /// A buildable job, e.g. a pipeline
    Job,
    /// Anything else: folders, organization scans, views
    Other,
}

impl ItemKind {
    pub fn is_job(self) -> bool {
        matches!(self, ItemKind::Project | ItemKind::Job)
    }

    pub fn is_project(self) -> bool {
        matches!(self, ItemKind::Project)
    }
}

/// An entity known to the orchestration engine
pub trait Item: Send + Sync {
    /// Slash-separated full name, e.g. `team/widgets-ci`
    fn full_name(&self) -> &str;

    fn kind(&self) -> ItemKind;

    /// The facet that exposes SCM configuration, if this item can be triggered by SCM changes
    fn as_scm_trigger_item(&self) -> Option<&dyn ScmTriggerItem> {
        None
    }

    /// Environment variables declared directly on the item
    fn declared_environment(&self) -> Option<&BTreeMap<String, String>> {
        None
    }
}

/// An item whose builds can be fired by changes in its SCMs
pub trait ScmTriggerItem {
    fn scms(&self) -> &[ScmConfig];
}

/// An item known to be a job
#[derive(Clone, Copy)]
pub struct Job<'a> {
    item: &'a dyn Item,
}

impl<'a> Job<'a> {
    /// Narrow an item to a job, `None` if it is not one
    pub fn from_item(item: &'a dyn Item) -> Option<Self> {
        item.kind().is_job().then_some(Self { item })
    }

    pub fn item(&self) -> &'a dyn Item {
        self.item
    }

    pub fn full_name(&self) -> &'a str {
        self.item.full_name()
    }

    /// Last segment of the full name
    pub fn base_name(&self) -> &'a str {
        let name = self.item.full_name();
        name.rsplit('/').next().unwrap_or(name)
    }
}

impl fmt::Debug for Job<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Job").field(&self.full_name()).finish()
    }
}

/// An item known to be a classic project
#[derive(Clone, Copy)]
pub struct Project<'a> {
    job: Job<'a>,
}

impl<'a> Project<'a> {
    /// Narrow an item to a project, `None` if it is not one
    pub fn from_item(item: &'a dyn Item) -> Option<Self> {
        item.kind()
            .is_project()
            .then_some(Self { job: Job { item } })
    }

    pub fn as_job(&self) -> Job<'a> {
        self.job
    }

    pub fn item(&self) -> &'a dyn Item {
        self.job.item
    }

    pub fn full_name(&self) -> &'a str {
        self.job.full_name()
    }
}

impl fmt::Debug for Project<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Project").field(&self.full_name()).finish()
    }
}
