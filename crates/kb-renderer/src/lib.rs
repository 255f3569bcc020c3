//! Markdown to HTML rendering for the kb knowledge base.
//!
//! [`MarkdownRenderer`] wraps pulldown-cmark with the extensions pages rely
//! on: GFM tables, strikethrough and task lists, bare URL autolinks, and
//! anchor ids on every heading. Raw HTML in the source is passed through.
//!
//! # Example
//!
//! ```
//! use kb_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new()
//!     .with_title_extraction()
//!     .render_markdown("# Hello\n\nSee https://example.com");
//!
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! assert!(result.html.contains(r#"<h1 id="hello">"#));
//! ```

mod linkify;
mod renderer;
mod slug;
mod util;

pub use renderer::{MarkdownRenderer, RenderResult};
pub use slug::{SlugRegistry, slugify};
pub use util::escape_html;
