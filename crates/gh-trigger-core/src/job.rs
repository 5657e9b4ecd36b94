//! Job definitions
//!
//! A plain, serde-loadable job that implements [`Item`]. Used by the CLI to
//! load jobs from a TOML file and by tests.

use crate::item::{Item, ItemKind, ScmTriggerItem};
use crate::scm::ScmConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A job as declared in a jobs file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDefinition {
    /// Full name, e.g. `team/widgets-ci`
    pub name: String,

    /// Item kind (default: "project")
    #[serde(default)]
    pub kind: ItemKind,

    /// Configured SCMs
    #[serde(default)]
    pub scm: Vec<ScmConfig>,

    /// Variables available when expanding remote URLs
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Whether pushes to the configured SCMs may trigger this job (default: true)
    #[serde(default = "default_triggers_on_push")]
    pub triggers_on_push: bool,
}

fn default_triggers_on_push() -> bool {
    true
}

impl JobDefinition {
    /// Create a project-kind job without any SCM
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::default(),
            scm: Vec::new(),
            env: BTreeMap::new(),
            triggers_on_push: default_triggers_on_push(),
        }
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_scm(mut self, scm: ScmConfig) -> Self {
        self.scm.push(scm);
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    pub fn with_triggers_on_push(mut self, triggers_on_push: bool) -> Self {
        self.triggers_on_push = triggers_on_push;
        self
    }
}

impl Item for JobDefinition {
    fn full_name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ItemKind {
        self.kind
    }

    fn as_scm_trigger_item(&self) -> Option<&dyn ScmTriggerItem> {
        if self.triggers_on_push {
            Some(self)
        } else {
            None
        }
    }

    fn declared_environment(&self) -> Option<&BTreeMap<String, String>> {
        Some(&self.env)
    }
}

impl ScmTriggerItem for JobDefinition {
    fn scms(&self) -> &[ScmConfig] {
        &self.scm
    }
}
