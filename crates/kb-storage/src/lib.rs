//! Read-only content store for the kb knowledge base.
//!
//! This crate provides a [`Storage`] trait that hides where pages and assets
//! live. The menu builder walks it once at startup and the request handlers
//! read from it afterwards.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `walk()`, `read()`, and `exists()` methods
//! - [`FsStorage`] implementation rooted at a local directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//! - [`parse_entry_name`]: the `<order> <label>` grammar of entry names
//!
//! # Path Convention
//!
//! Every path passed to or returned from a [`Storage`] is relative to the
//! store root and uses `/` separators regardless of platform:
//! - `""` - the store root
//! - `"pages"` - a top-level directory
//! - `"pages/2 Guides/1 Setup.md"` - a nested file
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use kb_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! for entry in storage.walk("pages")? {
//!     println!("{} (dir: {})", entry.path, entry.is_dir);
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod name;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use name::{
    EntryName, NameError, has_extension, parse_entry_name, segment_label, strip_extension,
};
pub use storage::{Entry, Storage, StorageError, StorageErrorKind, join_path};
