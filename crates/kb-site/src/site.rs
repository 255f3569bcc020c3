//! Site loading and page rendering.
//!
//! [`Site`] is built once at startup: it compiles the page template, builds
//! the menu and, when a searcher is supplied, fills the search index. Any
//! failure aborts construction. Afterwards it is immutable and shared across
//! request handlers behind an `Arc`.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use kb_site::{Site, SiteConfig};
//! use kb_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let site = Site::load(storage, SiteConfig::default(), None)?;
//!
//! let page = site.render("/2 Guides/1 Setup.md")?;
//! ```

use std::fmt::Write;
use std::sync::Arc;

use kb_renderer::{MarkdownRenderer, escape_html};
use kb_search::{SearchParams, Searcher};
use kb_storage::{Storage, has_extension, join_path, segment_label};

use crate::builder::{DuplicateOrder, MenuBuilder};
use crate::error::{PageError, SiteError};
use crate::menu::{Menu, MenuNode};
use crate::menu_html::menu_html;
use crate::resolver::PageResolver;
use crate::template::{PageContext, PageTemplate};
use crate::url::{encode_path, join_url};

/// Path segment (below the mount path) that serves search results.
pub const SEARCH_PATH: &str = "_search";

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Directory in the store holding the pages.
    pub pages_dir: String,
    /// Directory in the store holding static assets.
    pub assets_dir: String,
    /// URL prefix the site is mounted under.
    pub mount_path: String,
    /// File name of the home page.
    pub home_page: String,
    /// Page extension without the dot.
    pub page_extension: String,
    /// What to do with siblings sharing an order.
    pub duplicate_order: DuplicateOrder,
    /// Target of the top sidebar link (defaults to the mount path).
    pub root_url: Option<String>,
    /// Label of the top sidebar link.
    pub root_label: String,
    /// Label of the knowledge base root link.
    pub mount_label: Option<String>,
    /// Accent color.
    pub primary_color: Option<String>,
    /// Logo image URL or data URI.
    pub logo: Option<String>,
    /// Markup injected at the end of `<head>`.
    pub in_head: String,
    /// Markup injected at the start of `<body>`.
    pub before_body: String,
    /// Markup injected at the end of `<body>`.
    pub after_body: String,
    /// Markdown appended to every page before conversion.
    pub shared_markdown: String,
    /// Custom template source replacing the built-in one.
    pub template: Option<String>,
    /// Entries shown before the generated menu.
    pub base_menu: Vec<MenuNode>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            pages_dir: "pages".to_owned(),
            assets_dir: "assets".to_owned(),
            mount_path: "/".to_owned(),
            home_page: "index.md".to_owned(),
            page_extension: "md".to_owned(),
            duplicate_order: DuplicateOrder::default(),
            root_url: None,
            root_label: "Home".to_owned(),
            mount_label: None,
            primary_color: None,
            logo: None,
            in_head: String::new(),
            before_body: String::new(),
            after_body: String::new(),
            shared_markdown: String::new(),
            template: None,
            base_menu: Vec::new(),
        }
    }
}

/// A fully rendered HTML page.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// Complete HTML document.
    pub html: String,
    /// Heading shown above the content.
    pub heading: String,
    /// Store path the page was read from (empty for generated pages).
    pub store_path: String,
}

/// Knowledge base site: menu, template and page rendering.
pub struct Site {
    storage: Arc<dyn Storage>,
    config: SiteConfig,
    menu: Menu,
    base_menu: Menu,
    resolver: PageResolver,
    template: PageTemplate,
    renderer: MarkdownRenderer,
    searcher: Option<Arc<dyn Searcher>>,
    search_url: String,
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("config", &self.config)
            .field("menu", &self.menu)
            .field("search_enabled", &self.searcher.is_some())
            .finish_non_exhaustive()
    }
}

impl Site {
    /// Build the site: compile the template, build the menu, index pages.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if any of the steps fails.
    pub fn load(
        storage: Arc<dyn Storage>,
        config: SiteConfig,
        searcher: Option<Arc<dyn Searcher>>,
    ) -> Result<Self, SiteError> {
        let template = match &config.template {
            Some(source) => PageTemplate::new(source.as_str())?,
            None => PageTemplate::builtin()?,
        };

        let menu = MenuBuilder::new(config.mount_path.as_str())
            .with_home_page(config.home_page.as_str())
            .with_page_extension(config.page_extension.as_str())
            .with_duplicate_order(config.duplicate_order)
            .build(storage.as_ref(), &config.pages_dir)?;

        if let Some(searcher) = &searcher {
            searcher.index_all(storage.as_ref(), &config.pages_dir)?;
        }

        tracing::info!(
            pages_dir = %config.pages_dir,
            mount_path = %config.mount_path,
            entries = menu.len(),
            search = searcher.is_some(),
            "Loaded site"
        );

        let resolver = PageResolver::new(config.pages_dir.as_str(), config.mount_path.as_str())
            .with_home_page(config.home_page.as_str())
            .with_page_extension(config.page_extension.as_str());

        Ok(Self {
            base_menu: Menu::from_nodes(config.base_menu.iter().cloned()),
            search_url: encode_path(&join_url(&config.mount_path, SEARCH_PATH)),
            storage,
            menu,
            resolver,
            template,
            renderer: MarkdownRenderer::new(),
            searcher,
            config,
        })
    }

    /// The generated menu.
    #[must_use]
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// The base menu shown before the generated one.
    #[must_use]
    pub fn base_menu(&self) -> &Menu {
        &self.base_menu
    }

    /// Site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// True when a searcher is configured.
    #[must_use]
    pub fn search_enabled(&self) -> bool {
        self.searcher.is_some()
    }

    /// Render the page at a mount-relative request path.
    ///
    /// The whole document is produced in memory; on error nothing is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] when no page exists at the path, and
    /// other variants for read or template failures.
    pub fn render(&self, request_path: &str) -> Result<RenderedPage, PageError> {
        let page = self.resolver.resolve(request_path);
        let markdown = self
            .storage
            .read_string(&page.store_path)
            .map_err(|e| PageError::from_storage(e, &page.store_path))?;

        let mut source = markdown;
        if !self.config.shared_markdown.is_empty() {
            source.push_str("\n\n");
            source.push_str(&self.config.shared_markdown);
        }
        let content = self.renderer.render_markdown(&source).html;

        let html = self.render_template(&page.heading, &content, &page.canonical_path, "")?;
        tracing::debug!(store_path = %page.store_path, "Rendered page");

        Ok(RenderedPage {
            html,
            heading: page.heading,
            store_path: page.store_path,
        })
    }

    /// Render the search results page for `term`.
    ///
    /// A blank term renders the page without results.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::SearchDisabled`] when no searcher is configured.
    pub fn render_search(&self, term: &str) -> Result<RenderedPage, PageError> {
        let Some(searcher) = &self.searcher else {
            return Err(PageError::SearchDisabled);
        };
        let term = term.trim();

        let mut content = String::new();
        if !term.is_empty() {
            let paths = searcher.search(&SearchParams::new(term))?;
            self.write_results(&mut content, term, &paths);
        }

        let heading = if term.is_empty() {
            "Search".to_owned()
        } else {
            format!("Search results for \"{term}\"")
        };
        let html = self.render_template(&heading, &content, "", term)?;

        Ok(RenderedPage {
            html,
            heading,
            store_path: String::new(),
        })
    }

    /// Read an asset below the assets directory.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] for missing assets and
    /// [`PageError::Read`] for read failures.
    pub fn read_asset(&self, path: &str) -> Result<Vec<u8>, PageError> {
        let store_path = join_path(&self.config.assets_dir, path);
        self.storage
            .read(&store_path)
            .map_err(|e| PageError::from_storage(e, &store_path))
    }

    fn write_results(&self, content: &mut String, term: &str, paths: &[String]) {
        if paths.is_empty() {
            write!(
                content,
                "<p class=\"search-empty\">No pages match &quot;{}&quot;.</p>",
                escape_html(term)
            )
            .unwrap();
            return;
        }

        content.push_str("<ul class=\"search-results\">\n");
        for path in paths {
            let url = join_url(&self.config.mount_path, path);
            let label = self.menu.get(&url).map_or_else(
                || self.fallback_label(path),
                |node| node.label.clone(),
            );
            writeln!(
                content,
                "<li><a href=\"{}\">{}</a></li>",
                escape_html(&encode_path(&url)),
                escape_html(&label),
            )
            .unwrap();
        }
        content.push_str("</ul>");
    }

    fn fallback_label(&self, path: &str) -> String {
        let name = path.rsplit('/').next().unwrap_or(path);
        let extension = has_extension(name, &self.config.page_extension)
            .then_some(self.config.page_extension.as_str());
        segment_label(name, extension)
    }

    fn render_template(
        &self,
        heading: &str,
        content: &str,
        current_path: &str,
        search_term: &str,
    ) -> Result<String, PageError> {
        let menu = menu_html(&self.base_menu, &self.menu, current_path);
        let mount_path = self.config.mount_path.as_str();
        let root_url = self.config.root_url.as_deref().unwrap_or(mount_path);
        let mount_label = self.config.mount_label.as_deref().unwrap_or_default();

        let context = PageContext {
            heading,
            content,
            menu_html: &menu,
            primary_color: self.config.primary_color.as_deref(),
            logo: self.config.logo.as_deref(),
            root_url,
            root_label: &self.config.root_label,
            mount_path,
            mount_label,
            show_mount_link: !mount_label.is_empty() && root_url != mount_path,
            in_head: &self.config.in_head,
            before_body: &self.config.before_body,
            after_body: &self.config.after_body,
            search_url: self.searcher.is_some().then_some(self.search_url.as_str()),
            search_term,
        };
        Ok(self.template.render(&context)?)
    }
}
