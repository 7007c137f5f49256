//! Errors raised while listing, mapping and generating descriptors.

use super::descriptor::ResourceDescriptor;
use thiserror::Error;

/// Errors raised by the lister.
#[derive(Debug, Error)]
pub enum ListError {
    /// The page source failed: auth, transport, remote-side or malformed page.
    #[error("listing {scope} failed on page {page}")]
    Page {
        scope: String,
        /// 1-based index of the page being requested
        page: usize,
        #[source]
        source: anyhow::Error,
    },
    /// The API handed back a cursor that was already followed.
    #[error("listing {scope} returned a repeated page token on page {page}")]
    RepeatedPageToken { scope: String, page: usize },
    /// Cancellation was requested before listing finished.
    #[error("listing {scope} cancelled after {pages_fetched} page(s)")]
    Cancelled { scope: String, pages_fetched: usize },
}

/// Errors raised when a raw record cannot become a descriptor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("{resource_type} record has no string field '{field}'")]
    MissingName {
        resource_type: String,
        field: String,
    },
    #[error("{resource_type} record name '{name}' has an empty last segment")]
    EmptyLocalId { resource_type: String, name: String },
    #[error("{resource_type} needs argument '{key}' for attribute '{attribute}'")]
    MissingContext {
        resource_type: String,
        attribute: String,
        key: String,
    },
}

/// Errors surfaced by one generator run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A placeholder of the parent template has no argument.
    #[error("{resource_type}: missing argument '{key}'")]
    MissingArgument { resource_type: String, key: String },
    #[error("{resource_type}: invalid read-only attribute pattern '{pattern}'")]
    InvalidPattern {
        resource_type: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error(transparent)]
    List(#[from] ListError),
    #[error(transparent)]
    Map(#[from] MapError),
    /// The run was cancelled. `partial` holds what was mapped before the
    /// stop, without ignore keys; keeping or dropping it is up to the caller.
    #[error("{resource_type}: generation cancelled")]
    Cancelled {
        resource_type: String,
        partial: Vec<ResourceDescriptor>,
    },
}
