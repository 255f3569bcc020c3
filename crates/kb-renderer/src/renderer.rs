//! Markdown renderer producing HTML with heading anchors.

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::linkify::linkify;
use crate::slug::SlugRegistry;

/// GFM tables, strikethrough, task lists and explicit heading attributes.
fn parser_options() -> Options {
    Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Title extracted from first H1 heading (if title extraction was enabled).
    pub title: Option<String>,
}

/// Markdown to HTML renderer.
///
/// GFM extensions, bare URL autolinks and heading ids are always on.
#[derive(Clone, Debug)]
pub struct MarkdownRenderer {
    extract_title: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extract_title: false,
        }
    }

    /// Enable title extraction from first H1 heading.
    ///
    /// The heading is still rendered.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Render markdown text to HTML.
    #[must_use]
    pub fn render_markdown(&self, markdown: &str) -> RenderResult {
        let parser = Parser::new_ext(markdown, parser_options());
        let events: Vec<Event<'_>> = TextMergeStream::new(parser).collect();
        let events = linkify(events);

        let mut headings = HeadingPass::new(self.extract_title);
        let events = headings.run(events);

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());

        RenderResult {
            html,
            title: headings.title,
        }
    }
}

/// Assigns heading ids and picks up the title.
struct HeadingPass {
    extract_title: bool,
    slugs: SlugRegistry,
    title: Option<String>,
}

impl HeadingPass {
    fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            slugs: SlugRegistry::new(),
            title: None,
        }
    }

    fn run<'a>(&mut self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        // Explicit ids win, so reserve them before generating any.
        for event in &events {
            if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
                self.slugs.reserve(id);
            }
        }

        let mut out = Vec::with_capacity(events.len());
        let mut iter = events.into_iter();
        while let Some(event) = iter.next() {
            let (level, id, classes, attrs) = match event {
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => (level, id, classes, attrs),
                other => {
                    out.push(other);
                    continue;
                }
            };

            let mut inner = Vec::new();
            let mut text = String::new();
            for event in iter.by_ref() {
                match &event {
                    Event::End(TagEnd::Heading(_)) => break,
                    Event::Text(t) | Event::Code(t) => text.push_str(t),
                    _ => {}
                }
                inner.push(event);
            }

            let id = id.unwrap_or_else(|| CowStr::from(self.slugs.unique(&text)));
            if self.extract_title && self.title.is_none() && level == HeadingLevel::H1 {
                self.title = Some(text.trim().to_owned());
            }

            out.push(Event::Start(Tag::Heading {
                level,
                id: Some(id),
                classes,
                attrs,
            }));
            out.extend(inner);
            out.push(Event::End(TagEnd::Heading(level)));
        }
        out
    }
}
