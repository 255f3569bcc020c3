//! Configuration management for kb.
//!
//! Parses `kb.toml` with serde and discovers the file in the current
//! directory or any of its parents. CLI settings are applied during load
//! via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.root_url`
//! - `site.logo`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the content root directory.
    pub root_dir: Option<PathBuf>,
    /// Override the pages directory name.
    pub pages_dir: Option<String>,
    /// Override the assets directory name.
    pub assets_dir: Option<String>,
    /// Override the mount path.
    pub mount_path: Option<String>,
    /// Override the search enabled flag.
    pub search_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "kb.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content layout as parsed from TOML.
    docs: DocsConfigRaw,
    /// Branding and layout of the rendered pages.
    pub site: SiteConfig,
    /// Full-text search.
    pub search: SearchConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// What to do when two siblings share an order number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnDuplicateOrder {
    /// Fail the menu build.
    #[default]
    Error,
    /// Keep the entry listed last.
    Overwrite,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    root_dir: Option<String>,
    pages_dir: Option<String>,
    assets_dir: Option<String>,
    mount_path: Option<String>,
    home_page: Option<String>,
    page_extension: Option<String>,
    on_duplicate_order: Option<OnDuplicateOrder>,
}

/// Resolved content layout.
///
/// `pages_dir` and `assets_dir` are relative to `root_dir`.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory the content store is rooted at.
    pub root_dir: PathBuf,
    /// Pages root inside the store.
    pub pages_dir: String,
    /// Assets root inside the store.
    pub assets_dir: String,
    /// URL prefix the site is served under.
    pub mount_path: String,
    /// Filename served for the mount path itself.
    pub home_page: String,
    /// Page file extension, without the dot.
    pub page_extension: String,
    /// Duplicate order policy.
    pub on_duplicate_order: OnDuplicateOrder,
}

/// Branding and layout configuration (`[site]`).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Target of the top sidebar link (defaults to the mount path).
    pub root_url: Option<String>,
    /// Label of the top sidebar link.
    pub root_label: String,
    /// Label of the mount link.
    pub mount_label: Option<String>,
    /// CSS color used by the built-in template.
    pub primary_color: Option<String>,
    /// Logo image URL or data URI.
    pub logo: Option<String>,
    /// Raw HTML injected into `<head>`.
    pub in_head: String,
    /// Raw HTML injected at the start of `<body>`.
    pub before_body: String,
    /// Raw HTML injected at the end of `<body>`.
    pub after_body: String,
    /// Markdown appended to every page.
    pub shared_markdown: Option<String>,
    /// File whose contents are appended to every page.
    pub shared_markdown_file: Option<PathBuf>,
    /// Page template replacing the built-in one.
    pub template: Option<PathBuf>,
    /// Static menu rendered above the generated one.
    pub base_menu: Vec<MenuEntry>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: None,
            root_label: "Home".to_owned(),
            mount_label: None,
            primary_color: None,
            logo: None,
            in_head: String::new(),
            before_body: String::new(),
            after_body: String::new(),
            shared_markdown: None,
            shared_markdown_file: None,
            template: None,
            base_menu: Vec::new(),
        }
    }
}

/// Entry of the static base menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MenuEntry {
    /// Display label.
    pub label: String,
    /// Link target, used verbatim.
    pub path: String,
    /// Nested entries; a non-empty list makes this entry a group.
    pub children: Vec<MenuEntry>,
}

/// Search configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Build the search index and expose the search page.
    pub enabled: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Referenced file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.root_url`").
        field: String,
        /// Error message (e.g., "${`DOCS_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a directory name to be a single relative path.
fn require_relative_dir(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.starts_with('/') || value.split('/').any(|s| s == "..") {
        return Err(ConfigError::Validation(format!(
            "{field} must be a relative path inside docs.root_dir"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `kb.toml` in the current directory and its parents, falling back
    /// to defaults rooted at the current directory.
    ///
    /// CLI settings take precedence over file values; the merged result is
    /// validated.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(root_dir) = &settings.root_dir {
            self.docs_resolved.root_dir.clone_from(root_dir);
        }
        if let Some(pages_dir) = &settings.pages_dir {
            self.docs_resolved.pages_dir.clone_from(pages_dir);
        }
        if let Some(assets_dir) = &settings.assets_dir {
            self.docs_resolved.assets_dir.clone_from(assets_dir);
        }
        if let Some(mount_path) = &settings.mount_path {
            self.docs_resolved.mount_path.clone_from(mount_path);
        }
        if let Some(enabled) = settings.search_enabled {
            self.search.enabled = enabled;
        }
    }

    /// Search for `kb.toml` in the current directory and its parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config rooted at the current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config rooted at `base`.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            site: SiteConfig::default(),
            search: SearchConfig::default(),
            docs_resolved: DocsConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        self.validate_site()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;

        if !docs.mount_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "docs.mount_path must start with '/', got '{}'",
                docs.mount_path
            )));
        }

        require_relative_dir(&docs.pages_dir, "docs.pages_dir")?;
        require_relative_dir(&docs.assets_dir, "docs.assets_dir")?;
        if docs.pages_dir.trim_matches('/') == docs.assets_dir.trim_matches('/') {
            return Err(ConfigError::Validation(
                "docs.pages_dir and docs.assets_dir must differ".to_owned(),
            ));
        }

        require_non_empty(&docs.home_page, "docs.home_page")?;
        if docs.home_page.contains('/') {
            return Err(ConfigError::Validation(
                "docs.home_page must be a file name, not a path".to_owned(),
            ));
        }

        require_non_empty(&docs.page_extension, "docs.page_extension")?;
        if docs.page_extension.contains('.') {
            return Err(ConfigError::Validation(format!(
                "docs.page_extension must not contain a dot, got '{}'",
                docs.page_extension
            )));
        }

        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        if self.site.shared_markdown.is_some() && self.site.shared_markdown_file.is_some() {
            return Err(ConfigError::Validation(
                "site.shared_markdown and site.shared_markdown_file are mutually exclusive"
                    .to_owned(),
            ));
        }
        validate_menu_entries(&self.site.base_menu, "site.base_menu")
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        expand::expand_optional(&mut self.site.root_url, "site.root_url")?;
        expand::expand_optional(&mut self.site.logo, "site.logo")?;
        Ok(())
    }

    /// Resolve raw docs values and relative file paths against `config_dir`.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.docs;
        let or_default = |value: Option<&String>, default: &str| {
            value.map_or_else(|| default.to_owned(), Clone::clone)
        };

        self.docs_resolved = DocsConfig {
            root_dir: config_dir.join(raw.root_dir.as_deref().unwrap_or("")),
            pages_dir: or_default(raw.pages_dir.as_ref(), "pages"),
            assets_dir: or_default(raw.assets_dir.as_ref(), "assets"),
            mount_path: or_default(raw.mount_path.as_ref(), "/"),
            home_page: or_default(raw.home_page.as_ref(), "index.md"),
            page_extension: or_default(raw.page_extension.as_ref(), "md"),
            on_duplicate_order: raw.on_duplicate_order.unwrap_or_default(),
        };

        if let Some(path) = &mut self.site.shared_markdown_file {
            *path = config_dir.join(&*path);
        }
        if let Some(path) = &mut self.site.template {
            *path = config_dir.join(&*path);
        }
    }

    /// Markdown appended to every page, read from disk when configured as a file.
    pub fn shared_markdown(&self) -> Result<String, ConfigError> {
        if let Some(path) = &self.site.shared_markdown_file {
            return read_file(path);
        }
        Ok(self.site.shared_markdown.clone().unwrap_or_default())
    }

    /// Source of the custom page template, if one is configured.
    pub fn template_source(&self) -> Result<Option<String>, ConfigError> {
        self.site.template.as_deref().map(read_file).transpose()
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Check that every base menu entry has a label.
fn validate_menu_entries(entries: &[MenuEntry], field: &str) -> Result<(), ConfigError> {
    for (i, entry) in entries.iter().enumerate() {
        let field = format!("{field}[{i}]");
        if entry.label.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{field}.label cannot be empty"
            )));
        }
        validate_menu_entries(&entry.children, &format!("{field}.children"))?;
    }
    Ok(())
}
