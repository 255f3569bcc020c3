//! Page template.

use minijinja::Environment;
use serde::Serialize;

/// Template used when no custom one is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/page.html");

const TEMPLATE_NAME: &str = "page.html";

/// Values available to the page template.
///
/// Fields holding markup (`content`, `menu_html`, `in_head`, `before_body`,
/// `after_body`) must be printed with the `safe` filter; everything else is
/// autoescaped.
#[derive(Debug, Default, Serialize)]
pub struct PageContext<'a> {
    /// Breadcrumb-style heading, empty for the home page.
    pub heading: &'a str,
    /// Rendered page body.
    pub content: &'a str,
    /// Rendered navigation.
    pub menu_html: &'a str,
    /// Accent color for links.
    pub primary_color: Option<&'a str>,
    /// Logo image URL or data URI.
    pub logo: Option<&'a str>,
    /// Target of the top sidebar link.
    pub root_url: &'a str,
    /// Label of the top sidebar link.
    pub root_label: &'a str,
    /// Where the knowledge base is mounted.
    pub mount_path: &'a str,
    /// Label of the knowledge base root link.
    pub mount_label: &'a str,
    /// Whether to show the knowledge base root link under the top link.
    pub show_mount_link: bool,
    /// Markup injected at the end of `<head>`.
    pub in_head: &'a str,
    /// Markup injected at the start of `<body>`.
    pub before_body: &'a str,
    /// Markup injected at the end of `<body>`.
    pub after_body: &'a str,
    /// Search form target, when search is enabled.
    pub search_url: Option<&'a str>,
    /// Current search query.
    pub search_term: &'a str,
}

/// Compiled page template.
#[derive(Debug)]
pub struct PageTemplate {
    env: Environment<'static>,
}

impl PageTemplate {
    /// Compile a template from source.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the source is not a valid template.
    pub fn new(source: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source.into())?;
        Ok(Self { env })
    }

    /// Compile the built-in template.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the built-in template is broken.
    pub fn builtin() -> Result<Self, minijinja::Error> {
        Self::new(DEFAULT_TEMPLATE)
    }

    /// Render a full page into a string.
    ///
    /// # Errors
    ///
    /// Returns the execution error; nothing is produced on failure.
    pub fn render(&self, context: &PageContext<'_>) -> Result<String, minijinja::Error> {
        self.env.get_template(TEMPLATE_NAME)?.render(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>() -> PageContext<'a> {
        PageContext {
            heading: "Guides > Setup",
            content: "<p>Body</p>",
            menu_html: "<a class=\"menu-item\" href=\"/x\">X</a>",
            root_url: "/",
            root_label: "Home",
            mount_path: "/",
            in_head: "<meta name=\"x\" content=\"y\">",
            before_body: "<div id=\"banner\"></div>",
            after_body: "<script>init()</script>",
            ..PageContext::default()
        }
    }

    #[test]
    fn test_builtin_template_renders() {
        let template = PageTemplate::builtin().unwrap();

        let html = template.render(&context()).unwrap();

        assert!(html.contains("<title>Guides &gt; Setup | Home</title>"));
        assert!(html.contains("<h1 class=\"page-heading\">Guides &gt; Setup</h1>"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("<a class=\"menu-item\" href=\"/x\">X</a>"));
        assert!(html.contains("<meta name=\"x\" content=\"y\">"));
        assert!(html.contains("<div id=\"banner\"></div>"));
        assert!(html.contains("<script>init()</script>"));
        assert!(html.contains("--kb-primary: #2563eb;"));
    }

    #[test]
    fn test_builtin_template_branding() {
        let template = PageTemplate::builtin().unwrap();
        let ctx = PageContext {
            primary_color: Some("#ff0000"),
            logo: Some("/assets/logo.svg"),
            root_url: "https://example.com",
            mount_path: "/help",
            mount_label: "Help Center",
            show_mount_link: true,
            search_url: Some("/help/_search"),
            ..context()
        };

        let html = template.render(&ctx).unwrap();

        assert!(html.contains("--kb-primary: #ff0000;"));
        // Autoescaping also encodes `/`, so match on the distinctive parts.
        assert!(html.contains("<img class=\"logo\" src=\""));
        assert!(html.contains("logo.svg"));
        assert!(html.contains("\">Help Center</a>"));
        assert!(html.contains("_search\" method=\"get\""));
    }

    #[test]
    fn test_builtin_template_escapes_plain_fields() {
        let template = PageTemplate::builtin().unwrap();
        let ctx = PageContext {
            heading: "<script>",
            ..context()
        };

        let html = template.render(&ctx).unwrap();

        assert!(!html.contains("<h1 class=\"page-heading\"><script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_home_page_has_no_heading() {
        let template = PageTemplate::builtin().unwrap();
        let ctx = PageContext {
            heading: "",
            ..context()
        };

        let html = template.render(&ctx).unwrap();

        assert!(!html.contains("page-heading\">"));
        assert!(html.contains("<title>Home</title>"));
    }

    #[test]
    fn test_custom_template() {
        let template = PageTemplate::new("<h1>{{ heading }}</h1>{{ content|safe }}").unwrap();

        let html = template.render(&context()).unwrap();

        assert_eq!(html, "<h1>Guides &gt; Setup</h1><p>Body</p>");
    }

    #[test]
    fn test_invalid_template_fails_to_parse() {
        assert!(PageTemplate::new("{% if %}").is_err());
    }

    #[test]
    fn test_execution_error() {
        let template = PageTemplate::new("{{ missing_fn() }}").unwrap();

        assert!(template.render(&context()).is_err());
    }
}
