//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use kb_site::{Site, encode_path};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Loaded site.
    pub(crate) site: Arc<Site>,
    /// Encoded mount path without trailing slash (`""` for the root mount).
    pub(crate) mount_prefix: String,
    /// Encoded assets directory name without surrounding slashes.
    pub(crate) assets_prefix: String,
}

impl AppState {
    pub(crate) fn new(site: Arc<Site>) -> Self {
        let config = site.config();
        let mount_prefix = encode_path(config.mount_path.trim_end_matches('/'));
        let assets_prefix = encode_path(config.assets_dir.trim_matches('/'));
        Self {
            site,
            mount_prefix,
            assets_prefix,
        }
    }
}
