//! Full-text page search for the kb knowledge base.
//!
//! A [`Searcher`] is handed the content store once at startup to build its
//! index, then answers queries with the store-relative paths of matching
//! pages, best match first.
//!
//! [`MemorySearcher`] keeps the index in memory and ranks title matches ten
//! times higher than body matches.

mod error;
mod memory;

pub use error::SearchError;
pub use memory::MemorySearcher;

use kb_storage::Storage;

/// Number of results returned when [`SearchParams::limit`] is zero.
pub const DEFAULT_LIMIT: usize = 24;

/// Search query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Free-text query. Every word must match.
    pub term: String,
    /// Maximum number of results (0 means [`DEFAULT_LIMIT`]).
    pub limit: usize,
}

impl SearchParams {
    /// Query with the default limit.
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            limit: 0,
        }
    }

    /// Set the maximum number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Limit with the default applied.
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_LIMIT
        } else {
            self.limit
        }
    }
}

/// Page search index.
pub trait Searcher: Send + Sync {
    /// Index every page below `pages_root`, replacing any previous index.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Storage`] if the tree cannot be walked or a
    /// page cannot be read.
    fn index_all(&self, storage: &dyn Storage, pages_root: &str) -> Result<(), SearchError>;

    /// Return paths (relative to the pages root) of matching pages, best first.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyTerm`] when the query is blank.
    fn search(&self, params: &SearchParams) -> Result<Vec<String>, SearchError>;
}
