//! Search error types.

use kb_storage::StorageError;

/// Error returned by a [`Searcher`](crate::Searcher).
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query had no text.
    #[error("must provide a term to search for")]
    EmptyTerm,
    /// Reading pages for the index failed.
    #[error("could not index pages: {0}")]
    Storage(#[from] StorageError),
}
