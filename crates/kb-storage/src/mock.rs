//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::storage::{Entry, Storage, StorageError, StorageErrorKind};

/// Mock storage for testing.
///
/// Stores files in memory. Parent directories of every file are implied, so
/// `with_file("pages/2 Guides/1 Setup.md", ..)` also creates `pages` and
/// `pages/2 Guides`.
///
/// # Example
///
/// ```ignore
/// use kb_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("pages/index.md", "# Home")
///     .with_file("pages/1 Intro.md", "# Intro");
///
/// let entries = storage.walk("pages").unwrap();
/// let content = storage.read_string("pages/1 Intro.md").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    denied: BTreeSet<String>,
    reversed: bool,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.files.insert(path, content.into());
        self
    }

    /// Add an (empty) directory.
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.dirs.insert(path);
        self
    }

    /// Make reads of `path` (and walks through it) fail with permission denied.
    #[must_use]
    pub fn with_denied(mut self, path: impl Into<String>) -> Self {
        self.denied.insert(path.into());
        self
    }

    /// List siblings in descending name order.
    ///
    /// Useful for checking that consumers do not rely on listing order.
    #[must_use]
    pub fn with_reversed_listing(mut self) -> Self {
        self.reversed = true;
        self
    }

    fn add_parents(&mut self, path: &str) {
        let mut current = path;
        while let Some((parent, _)) = current.rsplit_once('/') {
            self.dirs.insert(parent.to_owned());
            current = parent;
        }
    }

    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || self.dirs.contains(path)
    }

    fn denied_error(path: &str) -> StorageError {
        StorageError::new(StorageErrorKind::PermissionDenied, path)
    }

    /// Compare two relative paths segment by segment so that sorting yields
    /// pre-order with siblings in the configured direction.
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let mut left = a.split('/');
        let mut right = b.split('/');
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(x), Some(y)) if x == y => {}
                (Some(x), Some(y)) if self.reversed => return y.cmp(x),
                (Some(x), Some(y)) => return x.cmp(y),
            }
        }
    }
}

impl Storage for MockStorage {
    fn walk(&self, root: &str) -> Result<Vec<Entry>, StorageError> {
        if !self.is_dir(root) {
            return Err(StorageError::not_found(root));
        }
        let prefix = if root.is_empty() {
            String::new()
        } else {
            format!("{root}/")
        };

        let mut entries: Vec<Entry> = self
            .dirs
            .iter()
            .filter_map(|d| d.strip_prefix(&prefix).map(Entry::dir))
            .chain(
                self.files
                    .keys()
                    .filter_map(|f| f.strip_prefix(&prefix).map(Entry::file)),
            )
            .filter(|e| !e.path.is_empty())
            .collect();
        entries.sort_by(|a, b| self.compare(&a.path, &b.path));

        if let Some(denied) = self
            .denied
            .iter()
            .find(|d| d.as_str() == root || (d.starts_with(&prefix) && self.is_dir(d)))
        {
            return Err(Self::denied_error(denied));
        }

        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        if self.denied.contains(path) {
            return Err(Self::denied_error(path));
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path) || self.is_dir(path)
    }
}
