//! Error types for menu building, site loading and page rendering.

use kb_search::SearchError;
use kb_storage::{NameError, StorageError};

/// Error returned when the menu cannot be built.
///
/// Any of these aborts the whole build; no partial menu is produced.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// A file or directory name does not follow `<order><space><label>`.
    #[error("invalid entry name {path:?}: {source}")]
    Grammar {
        /// Path relative to the pages directory.
        path: String,
        /// What is wrong with the name.
        source: NameError,
    },
    /// Two siblings share an order.
    #[error("order {order} is used by both {existing:?} and {duplicate:?}")]
    DuplicateOrder {
        /// The shared order.
        order: u64,
        /// Entry seen first.
        existing: String,
        /// Entry seen second.
        duplicate: String,
    },
    /// An entry was listed before its parent directory.
    #[error("parent directory of {path:?} was not seen before it")]
    MissingParent {
        /// Path relative to the pages directory.
        path: String,
    },
    /// Walking the pages directory failed.
    #[error("error walking pages directory: {0}")]
    Walk(#[from] StorageError),
}

/// Error returned when a [`Site`](crate::Site) cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The page template does not parse.
    #[error("could not parse template: {0}")]
    Template(#[from] minijinja::Error),
    /// The menu could not be built.
    #[error("could not build menu: {0}")]
    Menu(#[from] MenuError),
    /// The search index could not be built.
    #[error("could not index pages: {0}")]
    Index(#[from] SearchError),
}

/// Error returned when a page request fails.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// No page at the requested path.
    #[error("page not found: {0}")]
    NotFound(String),
    /// The page exists but could not be read.
    #[error("could not read page: {0}")]
    Read(#[source] StorageError),
    /// Template execution failed.
    #[error("could not render page: {0}")]
    Template(#[from] minijinja::Error),
    /// Search was requested but no searcher is configured.
    #[error("search is not enabled")]
    SearchDisabled,
    /// The searcher rejected the query.
    #[error("search failed: {0}")]
    Search(#[from] SearchError),
}

impl PageError {
    /// True when the request should be answered with 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::SearchDisabled)
    }

    /// Classify a storage error for the page at `path`.
    pub(crate) fn from_storage(err: StorageError, path: &str) -> Self {
        use kb_storage::StorageErrorKind;

        match err.kind {
            StorageErrorKind::NotFound | StorageErrorKind::InvalidPath => {
                Self::NotFound(path.to_owned())
            }
            _ => Self::Read(err),
        }
    }
}
