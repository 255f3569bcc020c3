//! Request path to page resolution.

use kb_storage::{has_extension, join_path, segment_label};

use crate::url::{decode_path, join_url};

/// Where a request path points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPage {
    /// Path in the content store (e.g. `pages/2 Guides/1 Setup.md`).
    pub store_path: String,
    /// Decoded path relative to the pages directory (`""` for the home page).
    pub page_path: String,
    /// Canonical URL path, comparable with menu node paths.
    pub canonical_path: String,
    /// Segment labels joined with `" > "`; empty for the home page.
    pub heading: String,
}

impl ResolvedPage {
    /// True for the home page.
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.page_path.is_empty()
    }
}

/// Maps mount-relative request paths onto the pages directory.
///
/// Resolution is pure string work; whether the page exists is decided when
/// it is read.
#[derive(Clone, Debug)]
pub struct PageResolver {
    pages_root: String,
    mount_path: String,
    home_page: String,
    page_extension: String,
}

impl PageResolver {
    /// Resolver for pages under `pages_root`, linked below `mount_path`.
    #[must_use]
    pub fn new(pages_root: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            pages_root: pages_root.into(),
            mount_path: mount_path.into(),
            home_page: "index.md".to_owned(),
            page_extension: "md".to_owned(),
        }
    }

    /// File name of the home page (default `index.md`).
    #[must_use]
    pub fn with_home_page(mut self, home_page: impl Into<String>) -> Self {
        self.home_page = home_page.into();
        self
    }

    /// Page extension without the dot (default `md`).
    #[must_use]
    pub fn with_page_extension(mut self, extension: impl Into<String>) -> Self {
        self.page_extension = extension.into();
        self
    }

    /// Resolve a path relative to the mount point.
    ///
    /// `""` and `"/"` resolve to the home page. Percent-escapes are decoded
    /// and surrounding slashes ignored.
    #[must_use]
    pub fn resolve(&self, request_path: &str) -> ResolvedPage {
        let decoded = decode_path(request_path);
        let page_path = decoded.trim_matches('/');

        if page_path.is_empty() {
            return ResolvedPage {
                store_path: join_path(&self.pages_root, &self.home_page),
                page_path: String::new(),
                canonical_path: join_url(&self.mount_path, ""),
                heading: String::new(),
            };
        }

        ResolvedPage {
            store_path: join_path(&self.pages_root, page_path),
            page_path: page_path.to_owned(),
            canonical_path: join_url(&self.mount_path, page_path),
            heading: self.heading(page_path),
        }
    }

    /// Labels of every segment joined with `" > "`.
    fn heading(&self, page_path: &str) -> String {
        let segments: Vec<&str> = page_path.split('/').filter(|s| !s.is_empty()).collect();
        let last = segments.len().saturating_sub(1);
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                let extension = (i == last && has_extension(segment, &self.page_extension))
                    .then_some(self.page_extension.as_str());
                segment_label(segment, extension)
            })
            .collect::<Vec<_>>()
            .join(" > ")
    }
}
