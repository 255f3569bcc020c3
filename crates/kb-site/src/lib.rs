//! Ordered menu tree, page resolution and rendering for the kb knowledge base.
//!
//! This crate provides:
//! - [`MenuBuilder`]: builds the ordered [`Menu`] from `<order> <label>` names
//! - [`PageResolver`]: maps request paths onto page files and headings
//! - [`render_menu`] / [`menu_html`]: navigation markup with active state
//! - [`Site`]: the loaded site, rendering full pages through the template
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use kb_site::{Site, SiteConfig};
//! use kb_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let site = Site::load(storage, SiteConfig::default(), None)?;
//!
//! let page = site.render("/1 Intro.md")?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod menu;
mod menu_html;
mod resolver;
mod site;
mod template;
mod url;

pub use builder::{DuplicateOrder, MenuBuilder};
pub use error::{MenuError, PageError, SiteError};
pub use menu::{Children, Menu, MenuNode, MenuNodeKind};
pub use menu_html::{MENU_CLASSES, MENU_CLASSES_ACTIVE, menu_html, render_menu};
pub use kb_storage::{EntryName, NameError, parse_entry_name};
pub use resolver::{PageResolver, ResolvedPage};
pub use site::{RenderedPage, SEARCH_PATH, Site, SiteConfig};
pub use template::{DEFAULT_TEMPLATE, PageContext, PageTemplate};
pub use url::{decode_path, encode_path, join_url};
