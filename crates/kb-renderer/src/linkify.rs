//! Bare URL autolinks (`https://...`, `www....`) in text.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?://|www\.)[^\s<>]+").unwrap());

/// Characters never kept at the end of a detected URL.
const TRAILING: &[char] = &['.', ',', ':', ';', '!', '?', '\'', '"', '*', '_', '~'];

/// Drop trailing punctuation and unbalanced closing parentheses.
fn trim_url(mut url: &str) -> &str {
    loop {
        let trimmed = url.trim_end_matches(TRAILING);
        let trimmed = if trimmed.ends_with(')')
            && trimmed.matches(')').count() > trimmed.matches('(').count()
        {
            &trimmed[..trimmed.len() - 1]
        } else {
            trimmed
        };
        if trimmed.len() == url.len() {
            return url;
        }
        url = trimmed;
    }
}

/// Split one text run into text and autolink events.
fn split_text<'a>(text: &str, out: &mut Vec<Event<'a>>) {
    let mut last = 0;
    for found in URL_RE.find_iter(text) {
        let url = trim_url(found.as_str());
        // "www." alone is not a link.
        if url.len() <= "www.".len() || url.ends_with("://") {
            continue;
        }
        let start = found.start();
        if start > last {
            out.push(Event::Text(CowStr::from(text[last..start].to_owned())));
        }
        let href = if url.starts_with("www.") {
            format!("http://{url}")
        } else {
            url.to_owned()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: href.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_owned())));
        out.push(Event::End(TagEnd::Link));
        last = start + url.len();
    }
    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_owned())));
    }
}

/// Wrap bare URLs in text events with links.
///
/// Text inside existing links, images and code blocks is left alone.
pub(crate) fn linkify(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut skip_depth = 0usize;

    for event in events {
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                skip_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                skip_depth = skip_depth.saturating_sub(1);
                out.push(event);
            }
            Event::Text(ref text) if skip_depth == 0 && URL_RE.is_match(text) => {
                split_text(text, &mut out);
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pulldown_cmark::{Parser, TextMergeStream};

    use super::*;

    fn render(markdown: &str) -> String {
        let events = linkify(TextMergeStream::new(Parser::new(markdown)).collect());
        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        html
    }

    #[test]
    fn test_trim_url() {
        assert_eq!(trim_url("https://a.io/x."), "https://a.io/x");
        assert_eq!(trim_url("https://a.io/x)."), "https://a.io/x");
        assert_eq!(trim_url("https://a.io/wiki/A_(b)"), "https://a.io/wiki/A_(b)");
    }

    #[test]
    fn test_linkify_bare_url() {
        assert_eq!(
            render("See https://example.com/docs."),
            "<p>See <a href=\"https://example.com/docs\">https://example.com/docs</a>.</p>\n"
        );
    }

    #[test]
    fn test_linkify_www() {
        assert_eq!(
            render("Go to www.example.com now"),
            "<p>Go to <a href=\"http://www.example.com\">www.example.com</a> now</p>\n"
        );
    }

    #[test]
    fn test_linkify_skips_existing_links() {
        assert_eq!(
            render("[https://a.io](https://b.io)"),
            "<p><a href=\"https://b.io\">https://a.io</a></p>\n"
        );
    }

    #[test]
    fn test_linkify_skips_code() {
        assert_eq!(
            render("`https://a.io`\n\n```\nhttps://b.io\n```"),
            "<p><code>https://a.io</code></p>\n<pre><code>https://b.io\n</code></pre>\n"
        );
    }
}
