//! HTTP server for the kb knowledge base.
//!
//! Serves, below the configured mount path:
//! - rendered Markdown pages from the pages directory
//! - files from the assets directory
//! - the search page at `_search?q=term` when search is enabled
//!
//! # Quick Start
//!
//! ```ignore
//! use kb_config::Config;
//! use kb_server::{run_server, server_config_from_config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None, None)?;
//!     run_server(server_config_from_config(&config)?).await
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use kb_config::{ConfigError, MenuEntry, OnDuplicateOrder};
use kb_search::{MemorySearcher, Searcher};
use kb_site::{DuplicateOrder, MenuNode, Site, SiteConfig, SiteError};
use kb_storage::FsStorage;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory the content store is rooted at.
    pub root_dir: PathBuf,
    /// Site layout and branding.
    pub site: SiteConfig,
    /// Index pages and serve the search page.
    pub search_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            root_dir: PathBuf::from("."),
            site: SiteConfig::default(),
            search_enabled: true,
        }
    }
}

/// Load the site described by `config` from the filesystem.
///
/// # Errors
///
/// Returns [`SiteError`] if the template, the menu or the search index
/// cannot be built.
pub fn load_site(config: &ServerConfig) -> Result<Site, SiteError> {
    let storage = Arc::new(FsStorage::new(config.root_dir.clone()));
    let searcher = config.search_enabled.then(|| {
        Arc::new(MemorySearcher::new().with_extension(config.site.page_extension.as_str()))
            as Arc<dyn Searcher>
    });
    Site::load(storage, config.site.clone(), searcher)
}

/// Create the router serving `site`.
///
/// Useful for embedding the knowledge base into a larger axum application.
pub fn router(site: Arc<Site>) -> Router {
    app::create_router(Arc::new(AppState::new(site)))
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the site fails to load or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let site = Arc::new(load_site(&config)?);
    let app = router(site);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        mount_path = %config.site.mount_path,
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from kb config.
///
/// Reads the custom template and shared Markdown file when configured.
///
/// # Errors
///
/// Returns [`ConfigError::ReadFile`] if a referenced file cannot be read.
pub fn server_config_from_config(config: &kb_config::Config) -> Result<ServerConfig, ConfigError> {
    let docs = &config.docs_resolved;
    let site = &config.site;

    let duplicate_order = match docs.on_duplicate_order {
        OnDuplicateOrder::Error => DuplicateOrder::Reject,
        OnDuplicateOrder::Overwrite => DuplicateOrder::Overwrite,
    };

    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root_dir: docs.root_dir.clone(),
        search_enabled: config.search.enabled,
        site: SiteConfig {
            pages_dir: docs.pages_dir.clone(),
            assets_dir: docs.assets_dir.clone(),
            mount_path: docs.mount_path.clone(),
            home_page: docs.home_page.clone(),
            page_extension: docs.page_extension.clone(),
            duplicate_order,
            root_url: site.root_url.clone(),
            root_label: site.root_label.clone(),
            mount_label: site.mount_label.clone(),
            primary_color: site.primary_color.clone(),
            logo: site.logo.clone(),
            in_head: site.in_head.clone(),
            before_body: site.before_body.clone(),
            after_body: site.after_body.clone(),
            shared_markdown: config.shared_markdown()?,
            template: config.template_source()?,
            base_menu: site.base_menu.iter().map(menu_node).collect(),
        },
    })
}

/// Convert a configured base menu entry; entries with children become groups.
fn menu_node(entry: &MenuEntry) -> MenuNode {
    if entry.children.is_empty() {
        MenuNode::page(entry.label.as_str(), entry.path.as_str())
    } else {
        MenuNode::group(
            entry.label.as_str(),
            entry.path.as_str(),
            entry.children.iter().map(menu_node),
        )
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use kb_storage::MockStorage;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    fn storage() -> MockStorage {
        MockStorage::new()
            .with_file("pages/index.md", "# Welcome\n\nStart here.")
            .with_file("pages/1 Intro.md", "Intro body")
            .with_file("pages/2 Guides/1 Setup.md", "# Setup\n\nInstall the tool.")
            .with_file("assets/style.css", "body { color: red }")
    }

    fn site(config: SiteConfig, search: bool) -> Arc<Site> {
        let searcher = search.then(|| Arc::new(MemorySearcher::new()) as Arc<dyn Searcher>);
        Arc::new(Site::load(Arc::new(storage()), config, searcher).unwrap())
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_home_page() {
        let app = router(site(SiteConfig::default(), false));

        let response = get(app, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        let body = body_text(response).await;
        assert!(body.contains("<p>Start here.</p>"));
    }

    #[tokio::test]
    async fn test_page_marks_active_menu_entry() {
        let app = router(site(SiteConfig::default(), false));

        let response = get(app, "/2%20Guides/1%20Setup.md").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<details open class=\"menu-item\">"));
        assert!(body.contains(
            "<a class=\"menu-item active\" href=\"/2%20Guides/1%20Setup.md\">Setup</a>"
        ));
        assert!(body.contains("Install the tool."));
    }

    #[tokio::test]
    async fn test_trailing_slash_is_ignored() {
        let app = router(site(SiteConfig::default(), false));

        let response = get(app, "/1%20Intro.md/").await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_page_is_not_found() {
        let app = router(site(SiteConfig::default(), false));

        let response = get(app, "/9%20Missing.md").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Not Found");
    }

    #[tokio::test]
    async fn test_group_path_is_not_found() {
        let app = router(site(SiteConfig::default(), false));

        let response = get(app, "/2%20Guides").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_is_rejected() {
        let app = router(site(SiteConfig::default(), false));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_asset_with_etag() {
        let app = router(site(SiteConfig::default(), false));

        let response = get(app.clone(), "/assets/style.css").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        let etag = response.headers()[header::ETAG].clone();
        assert_eq!(body_text(response).await, "body { color: red }");

        let cached = app
            .oneshot(
                Request::get("/assets/style.css")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_missing_asset_is_not_found() {
        let app = router(site(SiteConfig::default(), false));

        let response = get(app, "/assets/missing.js").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mount_path() {
        let config = SiteConfig {
            mount_path: "/docs".to_owned(),
            ..SiteConfig::default()
        };
        let app = router(site(config, false));

        assert_eq!(get(app.clone(), "/").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(get(app.clone(), "/docs").await.status(), StatusCode::OK);
        assert_eq!(get(app.clone(), "/docs/").await.status(), StatusCode::OK);
        assert_eq!(
            get(app.clone(), "/docs/assets/style.css").await.status(),
            StatusCode::OK
        );

        let body = body_text(get(app, "/docs/1%20Intro.md").await).await;
        assert!(body.contains("href=\"/docs/1%20Intro.md\""));
    }

    #[tokio::test]
    async fn test_search_results() {
        let app = router(site(SiteConfig::default(), true));

        let response = get(app, "/_search?q=install").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<ul class=\"search-results\">"));
        assert!(body.contains(">Setup</a>"));
    }

    #[tokio::test]
    async fn test_search_without_term() {
        let app = router(site(SiteConfig::default(), true));

        let response = get(app, "/_search").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!body_text(response).await.contains("search-results"));
    }

    #[tokio::test]
    async fn test_search_disabled_is_not_found() {
        let app = router(site(SiteConfig::default(), false));

        let response = get(app, "/_search?q=install").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_menu_node_from_entries() {
        let entry = MenuEntry {
            label: "Company".to_owned(),
            path: String::new(),
            children: vec![MenuEntry {
                label: "About".to_owned(),
                path: "https://example.com/about".to_owned(),
                children: Vec::new(),
            }],
        };

        let node = menu_node(&entry);

        assert!(node.is_group());
        assert_eq!(node.children.len(), 1);
        let about = node.children.iter().next().unwrap();
        assert_eq!(about.href, "https://example.com/about");
        assert!(!about.is_group());
    }

    #[test]
    fn test_server_config_from_config() {
        let config = kb_config::Config::default();

        let server = server_config_from_config(&config).unwrap();

        assert_eq!(server.port, 8080);
        assert!(server.search_enabled);
        assert_eq!(server.site.pages_dir, "pages");
        assert_eq!(server.site.duplicate_order, DuplicateOrder::Reject);
        assert_eq!(server.site.shared_markdown, "");
        assert!(server.site.template.is_none());
    }
}
