//! In-memory search index.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use kb_renderer::MarkdownRenderer;
use kb_storage::{Storage, join_path, segment_label};

use crate::{SearchError, SearchParams, Searcher};

/// Weight of a query word found in the page title.
const TITLE_WEIGHT: usize = 10;
/// Weight of a query word found in the page body.
const CONTENT_WEIGHT: usize = 1;

/// Split text into lowercase alphanumeric words.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn count_terms(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in tokenize(text) {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug)]
struct IndexedPage {
    path: String,
    title: HashMap<String, usize>,
    content: HashMap<String, usize>,
}

impl IndexedPage {
    /// Weighted score, or `None` if any word is missing from the page.
    fn score(&self, words: &[String]) -> Option<usize> {
        words.iter().try_fold(0, |total, word| {
            let title = self.title.get(word).copied().unwrap_or(0);
            let content = self.content.get(word).copied().unwrap_or(0);
            if title == 0 && content == 0 {
                None
            } else {
                Some(total + title * TITLE_WEIGHT + content * CONTENT_WEIGHT)
            }
        })
    }
}

/// Searcher that keeps its index in memory.
///
/// The page title is the first level-one heading, falling back to the file name
/// label. Hidden files and files without the page extension are not indexed.
#[derive(Debug)]
pub struct MemorySearcher {
    extension: String,
    pages: RwLock<Vec<IndexedPage>>,
}

impl Default for MemorySearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySearcher {
    /// Create an empty index for `.md` pages.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extension: "md".to_owned(),
            pages: RwLock::new(Vec::new()),
        }
    }

    /// Index files with this extension (without the dot) instead of `md`.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Number of indexed pages.
    pub fn len(&self) -> usize {
        self.pages.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_page(&self, path: &str) -> bool {
        let hidden = path.split('/').any(|segment| segment.starts_with('.'));
        let matches_ext = path
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext == self.extension);
        !hidden && matches_ext
    }
}

impl Searcher for MemorySearcher {
    fn index_all(&self, storage: &dyn Storage, pages_root: &str) -> Result<(), SearchError> {
        let renderer = MarkdownRenderer::new().with_title_extraction();
        let mut pages = Vec::new();
        for entry in storage.walk(pages_root)? {
            if entry.is_dir || !self.is_page(&entry.path) {
                continue;
            }
            let markdown = storage.read_string(&join_path(pages_root, &entry.path))?;
            let title = renderer
                .render_markdown(&markdown)
                .title
                .unwrap_or_else(|| segment_label(entry.name(), Some(self.extension.as_str())));
            pages.push(IndexedPage {
                title: count_terms(&title),
                content: count_terms(&markdown),
                path: entry.path,
            });
        }

        tracing::info!(pages = pages.len(), "Built search index");
        *self.pages.write().unwrap_or_else(PoisonError::into_inner) = pages;
        Ok(())
    }

    fn search(&self, params: &SearchParams) -> Result<Vec<String>, SearchError> {
        if params.term.trim().is_empty() {
            return Err(SearchError::EmptyTerm);
        }
        let words: Vec<String> = tokenize(&params.term).collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let pages = self.pages.read().unwrap_or_else(PoisonError::into_inner);
        let mut hits: Vec<(usize, &str)> = pages
            .iter()
            .filter_map(|page| page.score(&words).map(|score| (score, page.path.as_str())))
            .collect();
        hits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        Ok(hits
            .into_iter()
            .take(params.effective_limit())
            .map(|(_, path)| path.to_owned())
            .collect())
    }
}
