//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading pages and assets from a local directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{Entry, Storage, StorageError, StorageErrorKind, join_path};

/// Filesystem storage rooted at a directory.
///
/// Store paths are resolved below the root directory; paths that try to
/// escape it are rejected.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use kb_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("docs"));
/// let index = storage.read_string("pages/index.md")?;
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a store path onto the filesystem.
    ///
    /// Rejects paths containing parent directory components (`..`) or root
    /// prefixes so that requests cannot escape the store root.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let mut resolved = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(part)), None) => resolved.push(part),
                _ => {
                    return Err(StorageError::new(StorageErrorKind::InvalidPath, path));
                }
            }
        }
        Ok(resolved)
    }

    /// Recursively list `dir`, appending entries in pre-order.
    fn walk_dir(dir: &Path, rel: &str, out: &mut Vec<Entry>) -> Result<(), StorageError> {
        let read_dir = fs::read_dir(dir).map_err(|e| StorageError::io(e, rel))?;

        let mut children = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| StorageError::io(e, rel))?;
            let name = entry.file_name().into_string().map_err(|raw| {
                StorageError::new(
                    StorageErrorKind::InvalidPath,
                    join_path(rel, &raw.to_string_lossy()),
                )
            })?;
            let file_type = entry.file_type().map_err(|e| StorageError::io(e, rel))?;
            // Linked directories may point back at an ancestor.
            if file_type.is_symlink() && entry.path().is_dir() {
                tracing::debug!(path = %join_path(rel, &name), "Skipping linked directory");
                continue;
            }
            children.push((name, file_type.is_dir(), entry.path()));
        }
        children.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, is_dir, abs) in children {
            let child_rel = join_path(rel, &name);
            out.push(Entry {
                path: child_rel.clone(),
                is_dir,
            });
            if is_dir {
                Self::walk_dir(&abs, &child_rel, out)?;
            }
        }
        Ok(())
    }
}

impl Storage for FsStorage {
    fn walk(&self, root: &str) -> Result<Vec<Entry>, StorageError> {
        let dir = self.resolve(root)?;
        let meta = fs::metadata(&dir).map_err(|e| StorageError::io(e, root))?;
        if !meta.is_dir() {
            return Err(StorageError::new(StorageErrorKind::InvalidPath, root));
        }

        let mut entries = Vec::new();
        Self::walk_dir(&dir, "", &mut entries)?;

        tracing::debug!(root, entries = entries.len(), "Walked storage");
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let file = self.resolve(path)?;
        if file.is_dir() {
            return Err(StorageError::not_found(path));
        }
        fs::read(&file).map_err(|e| StorageError::io(e, path))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.exists())
    }
}
