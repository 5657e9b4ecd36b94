//! Errors surfaced by association resolution

use thiserror::Error;

/// Errors that abort a `resolve_associations` query
///
/// Recoverable problems (unknown item kinds, unparsable URLs, failing
/// environment providers) never show up here; they only reduce the set of
/// associations that is returned.
#[derive(Error, Debug)]
pub enum AssociationError {
    /// The contributor declared none of the supported API generations
    #[error("Contributor {contributor} must implement contribute_for_item")]
    Unimplemented { contributor: String },

    /// The contributor itself failed
    #[error("Contributor {contributor} failed: {source}")]
    Contributor {
        contributor: String,
        #[source]
        source: anyhow::Error,
    },
}
