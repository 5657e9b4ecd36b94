//! Branch patterns
//!
//! A [`BranchSpec`] is the branch selector configured on a Git SCM, for
//! example `master`, `feature/*`, `**` or a raw regex written as `:^rel-\d+$`.
//! It is matched against the full ref of an incoming push
//! (`refs/heads/master`) or against a remote-tracking name (`origin/master`).
//!
//! Wildcards:
//! - `*` matches any run of characters except `/`
//! - `**` matches any run of characters including `/`
//!
//! Names that do not start with `refs/` or `remotes/` may be preceded by an
//! optional `refs/heads/`, `refs/remotes/<remote>/` or `remotes/<remote>/`.
//! A single-segment name (no `/`, no `**`) also matches under a bare
//! `<remote>/`, so `master` matches `origin/master`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Pattern used when the configured name is blank
const MATCH_ALL: &str = "**";

/// Prefixes accepted in front of an unqualified branch name
const OPTIONAL_REF_PREFIX: &str = "(?:refs/heads/|refs/remotes/[^/]+/|remotes/[^/]+/)?";

/// Same as [`OPTIONAL_REF_PREFIX`], plus a bare remote name for single-segment names
const OPTIONAL_REMOTE_PREFIX: &str =
    "(?:refs/heads/|refs/remotes/[^/]+/|remotes/[^/]+/|[^/]+/)?";

/// Errors that can occur while building a branch matcher
#[derive(Error, Debug)]
pub enum BranchSpecError {
    #[error("Invalid branch pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A branch pattern and its compiled matcher
///
/// Equality, ordering and hashing only consider the pattern text.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchSpec {
    name: String,
    matcher: Regex,
}

impl BranchSpec {
    /// Create a branch spec from a pattern string
    ///
    /// The name is trimmed; a blank name matches every branch.
    pub fn new(name: impl AsRef<str>) -> Result<Self, BranchSpecError> {
        let name = match name.as_ref().trim() {
            "" => MATCH_ALL.to_string(),
            trimmed => trimmed.to_string(),
        };

        let pattern = build_pattern(&name);
        let matcher = Regex::new(&pattern).map_err(|source| BranchSpecError::InvalidPattern {
            pattern: name.clone(),
            source,
        })?;

        Ok(Self { name, matcher })
    }

    /// The configured pattern text
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether a ref (e.g. `refs/heads/master`) matches this pattern
    pub fn matches(&self, git_ref: &str) -> bool {
        self.matcher.is_match(git_ref)
    }
}

/// Translate a branch name into an anchored regular expression
fn build_pattern(name: &str) -> String {
    if let Some(raw) = name.strip_prefix(':') {
        return format!("^(?:{})$", raw);
    }

    let mut pattern = String::from("^");
    if !name.contains('/') && !name.contains("**") {
        pattern.push_str(OPTIONAL_REMOTE_PREFIX);
    } else if !name.starts_with("refs/") && !name.starts_with("remotes/") {
        pattern.push_str(OPTIONAL_REF_PREFIX);
    }

    let mut chars = name.chars().peekable();
    let mut buf = [0u8; 4];
    while let Some(c) = chars.next() {
        if c == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
                pattern.push_str(".*");
            } else {
                pattern.push_str("[^/]*");
            }
        } else {
            pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }

    pattern.push('$');
    pattern
}

impl FromStr for BranchSpec {
    type Err = BranchSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BranchSpec {
    type Error = BranchSpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BranchSpec> for String {
    fn from(spec: BranchSpec) -> Self {
        spec.name
    }
}

impl PartialEq for BranchSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for BranchSpec {}

impl Hash for BranchSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for BranchSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BranchSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Debug for BranchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BranchSpec").field(&self.name).finish()
    }
}

impl fmt::Display for BranchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
