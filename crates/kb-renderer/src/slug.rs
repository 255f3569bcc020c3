//! Heading anchor ids.

use std::collections::HashMap;

/// Turn heading text into an anchor id.
///
/// Letters and digits are lowercased and kept, whitespace and `-` become `-`,
/// `_` is kept, everything else is dropped. Empty results become `"heading"`.
///
/// # Examples
///
/// ```
/// use kb_renderer::slugify;
///
/// assert_eq!(slugify("Getting Started!"), "getting-started");
/// assert_eq!(slugify("API v2_beta"), "api-v2_beta");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            slug.push('-');
        } else if c == '_' {
            slug.push('_');
        }
    }
    if slug.is_empty() {
        "heading".to_owned()
    } else {
        slug
    }
}

/// Hands out unique anchor ids within one document.
///
/// The first heading with a given slug keeps it; later ones get `-1`, `-2`
/// and so on appended.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
}

impl SlugRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id as-is (for headings with explicit `{#id}` attributes).
    pub fn reserve(&mut self, id: &str) {
        self.seen.entry(id.to_owned()).or_insert(0);
    }

    /// Return a unique id derived from `text`.
    pub fn unique(&mut self, text: &str) -> String {
        let base = slugify(text);
        let Some(mut count) = self.seen.get(&base).copied() else {
            self.seen.insert(base.clone(), 0);
            return base;
        };
        loop {
            count += 1;
            let candidate = format!("{base}-{count}");
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(base, count);
                self.seen.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }
}
