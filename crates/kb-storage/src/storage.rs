//! Storage trait and error types.
//!
//! [`Storage`] walks and reads a read-only content tree; every backend
//! reports failures as [`StorageError`].

/// One file or directory found while walking a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the walked root, `/`-separated (e.g. `"2 Guides/1 Setup.md"`).
    pub path: String,
    /// True for directories.
    pub is_dir: bool,
}

impl Entry {
    /// Create a file entry.
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    /// Create a directory entry.
    #[must_use]
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }

    /// Last path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Path of the containing directory relative to the walked root.
    ///
    /// Top-level entries return `""`.
    #[must_use]
    pub fn parent(&self) -> &str {
        self.path.rsplit_once('/').map_or("", |(parent, _)| parent)
    }
}

/// Join two store paths with a single `/`.
///
/// Empty components are dropped so that joining onto the store root (`""`)
/// yields the other path unchanged.
#[must_use]
pub fn join_path(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match (base.is_empty(), path.is_empty()) {
        (true, _) => path.to_owned(),
        (false, true) => base.to_owned(),
        (false, false) => format!("{base}/{path}"),
    }
}

/// What went wrong, independent of the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Nothing readable at the path (missing, or a directory where a file was expected).
    NotFound,
    /// The backend refused access.
    PermissionDenied,
    /// The path escapes the store or names the wrong kind of entry.
    InvalidPath,
    /// Content is not valid UTF-8.
    InvalidData,
    /// Anything else.
    Other,
}

impl StorageErrorKind {
    fn from_io(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::InvalidData => Self::InvalidData,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::InvalidPath => "invalid path",
            Self::InvalidData => "invalid data",
            Self::Other => "storage error",
        })
    }
}

type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Failure to walk or read a store path.
///
/// Displays as `"<path>: <kind>"`, followed by the cause in parentheses
/// when there is one.
#[derive(Debug, thiserror::Error)]
#[error("{path}: {kind}{}", cause_suffix(.source.as_ref()))]
pub struct StorageError {
    /// Error category.
    pub kind: StorageErrorKind,
    /// Store path the operation was applied to.
    pub path: String,
    #[source]
    source: Option<BoxedCause>,
}

fn cause_suffix(source: Option<&BoxedCause>) -> String {
    source.map(|cause| format!(" ({cause})")).unwrap_or_default()
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            source: None,
        }
    }

    /// Nothing readable at `path`.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::NotFound, path)
    }

    /// Classify an I/O failure on `path`.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::from_io(err.kind()), path).caused_by(err)
    }

    /// Keep `cause` as the error source.
    #[must_use]
    pub fn caused_by(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(cause));
        self
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

/// Read-only hierarchical content store.
///
/// Implementations must be safe to share across request handlers; nothing in
/// the trait mutates the store.
pub trait Storage: Send + Sync {
    /// Walk the tree below `root` in pre-order.
    ///
    /// The root itself is not returned. Every directory is yielded before its
    /// contents, and returned paths are relative to `root`. Sibling order is
    /// backend-defined; callers must not depend on it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if `root` is missing or any directory below it
    /// cannot be listed.
    fn walk(&self, root: &str) -> Result<Vec<Entry>, StorageError>;

    /// Read the full contents of a file.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageErrorKind::NotFound`] error when the path does not
    /// exist or names a directory, and other kinds for real read failures.
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Check whether a file or directory exists at the given path.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;

    /// Read a file and decode it as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns the underlying read error, or [`StorageErrorKind::InvalidData`]
    /// when the bytes are not valid UTF-8.
    fn read_string(&self, path: &str) -> Result<String, StorageError> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| StorageError::new(StorageErrorKind::InvalidData, path).caused_by(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_and_parent() {
        let entry = Entry::file("2 Guides/1 Setup.md");

        assert_eq!(entry.name(), "1 Setup.md");
        assert_eq!(entry.parent(), "2 Guides");
        assert!(!entry.is_dir);
    }

    #[test]
    fn test_entry_top_level_parent_is_empty() {
        let entry = Entry::dir("2 Guides");

        assert_eq!(entry.name(), "2 Guides");
        assert_eq!(entry.parent(), "");
        assert!(entry.is_dir);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("pages", "1 Intro.md"), "pages/1 Intro.md");
        assert_eq!(join_path("pages/", "/1 Intro.md"), "pages/1 Intro.md");
        assert_eq!(join_path("", "1 Intro.md"), "1 Intro.md");
        assert_eq!(join_path("pages", ""), "pages");
        assert_eq!(join_path("", ""), "");
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::new(StorageErrorKind::PermissionDenied, "pages/2 Guides");

        assert_eq!(err.to_string(), "pages/2 Guides: permission denied");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_storage_error_display_with_cause() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = StorageError::io(io_err, "pages/1 Intro.md");

        assert_eq!(err.to_string(), "pages/1 Intro.md: not found (no such file)");
        assert!(err.is_not_found());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_storage_error_io_kinds() {
        let cases = [
            (std::io::ErrorKind::NotFound, StorageErrorKind::NotFound),
            (
                std::io::ErrorKind::PermissionDenied,
                StorageErrorKind::PermissionDenied,
            ),
            (std::io::ErrorKind::InvalidData, StorageErrorKind::InvalidData),
            (std::io::ErrorKind::Interrupted, StorageErrorKind::Other),
        ];

        for (io_kind, expected) in cases {
            let err = StorageError::io(std::io::Error::new(io_kind, "boom"), "pages/a.md");
            assert_eq!(err.kind, expected);
            assert_eq!(err.path, "pages/a.md");
        }
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        static_assertions::assert_impl_all!(StorageError: Send, Sync);
    }
}
