//! Menu construction from the pages directory.

use std::collections::HashMap;

use kb_storage::{Entry, Storage, has_extension, parse_entry_name};

use crate::error::MenuError;
use crate::menu::{Children, Menu, MenuNode, MenuNodeKind};
use crate::url::{encode_path, join_url};

/// What to do when two siblings share an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicateOrder {
    /// Fail the build.
    #[default]
    Reject,
    /// Keep the entry walked last and log a warning.
    Overwrite,
}

/// Builds a [`Menu`] from one pre-order walk of the pages directory.
///
/// Entry rules:
/// - names starting with `.` are skipped, with everything below them
/// - files without the page extension are skipped
/// - files named like the home page are skipped at every depth
/// - every other name must follow `<order><space><label>`
/// - directories that end up without any page are dropped
///
/// # Example
///
/// ```ignore
/// use kb_site::MenuBuilder;
/// use kb_storage::FsStorage;
///
/// let storage = FsStorage::new("docs".into());
/// let menu = MenuBuilder::new("/help").build(&storage, "pages")?;
/// ```
#[derive(Clone, Debug)]
pub struct MenuBuilder {
    mount_path: String,
    home_page: String,
    page_extension: String,
    duplicate_order: DuplicateOrder,
}

impl MenuBuilder {
    /// Builder for a site mounted at `mount_path`.
    #[must_use]
    pub fn new(mount_path: impl Into<String>) -> Self {
        Self {
            mount_path: mount_path.into(),
            home_page: "index.md".to_owned(),
            page_extension: "md".to_owned(),
            duplicate_order: DuplicateOrder::default(),
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

    /// Duplicate order policy (default [`DuplicateOrder::Reject`]).
    #[must_use]
    pub fn with_duplicate_order(mut self, policy: DuplicateOrder) -> Self {
        self.duplicate_order = policy;
        self
    }

    /// Walk `pages_root` and build the menu.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError`] on the first malformed name, duplicate order
    /// (when rejecting duplicates) or storage failure.
    pub fn build(&self, storage: &dyn Storage, pages_root: &str) -> Result<Menu, MenuError> {
        let entries = storage.walk(pages_root)?;

        let mut root = Children::default();
        // Directory path (relative to pages_root) -> order chain from the root.
        let mut dirs: HashMap<String, Vec<u64>> = HashMap::from([(String::new(), Vec::new())]);

        for entry in entries {
            if !self.is_menu_entry(&entry) {
                continue;
            }

            let extension = (!entry.is_dir).then_some(self.page_extension.as_str());
            let name = parse_entry_name(entry.name(), extension).map_err(|source| {
                MenuError::Grammar {
                    path: entry.path.clone(),
                    source,
                }
            })?;

            let Some(parent_chain) = dirs.get(entry.parent()) else {
                return Err(MenuError::MissingParent { path: entry.path });
            };
            let mut chain = parent_chain.clone();

            let path = join_url(&self.mount_path, &entry.path);
            let node = MenuNode {
                label: name.label,
                href: encode_path(&path),
                path,
                kind: if entry.is_dir {
                    MenuNodeKind::Group
                } else {
                    MenuNodeKind::Page
                },
                children: Children::default(),
            };

            let siblings = siblings_mut(&mut root, &chain)
                .ok_or_else(|| MenuError::MissingParent {
                    path: entry.path.clone(),
                })?;
            self.place(siblings, name.order, node)?;

            if entry.is_dir {
                chain.push(name.order);
                dirs.insert(entry.path, chain);
            }
        }

        root.prune_empty_groups();
        let menu = Menu::new(root);
        tracing::debug!(
            pages_root,
            mount_path = %self.mount_path,
            entries = menu.len(),
            "Built menu"
        );
        Ok(menu)
    }

    fn is_menu_entry(&self, entry: &Entry) -> bool {
        if entry.path.split('/').any(|segment| segment.starts_with('.')) {
            return false;
        }
        if entry.is_dir {
            return true;
        }
        has_extension(entry.name(), &self.page_extension) && entry.name() != self.home_page
    }

    fn place(&self, siblings: &mut Children, order: u64, node: MenuNode) -> Result<(), MenuError> {
        match siblings.get(order) {
            Some(existing) if self.duplicate_order == DuplicateOrder::Reject => {
                Err(MenuError::DuplicateOrder {
                    order,
                    existing: existing.path.clone(),
                    duplicate: node.path,
                })
            }
            Some(existing) => {
                tracing::warn!(
                    order,
                    existing = %existing.path,
                    replacement = %node.path,
                    "Duplicate menu order, keeping the later entry"
                );
                siblings.insert(order, node);
                Ok(())
            }
            None => {
                siblings.insert(order, node);
                Ok(())
            }
        }
    }
}

/// Children of the node reached by following `chain` from the root.
fn siblings_mut<'a>(root: &'a mut Children, chain: &[u64]) -> Option<&'a mut Children> {
    let mut children = root;
    for order in chain {
        children = &mut children.get_mut(*order)?.children;
    }
    Some(children)
}

#[cfg(test)]
mod tests {
    use kb_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Labels as a nested outline: `Guides[Setup, Usage]`.
    fn outline(children: &Children) -> String {
        children
            .iter()
            .map(|node| {
                if node.is_group() {
                    format!("{}[{}]", node.label, outline(&node.children))
                } else {
                    node.label.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn build(storage: &MockStorage) -> Result<Menu, MenuError> {
        MenuBuilder::new("/").build(storage, "pages")
    }

    fn guides_site() -> MockStorage {
        MockStorage::new()
            .with_file("pages/index.md", "# Home")
            .with_file("pages/1 Intro.md", "# Intro")
            .with_file("pages/2 Guides/1 Setup.md", "# Setup")
            .with_file("pages/2 Guides/2 Usage.md", "# Usage")
    }

    #[test]
    fn test_build_nested_menu() {
        let menu = build(&guides_site()).unwrap();

        assert_eq!(outline(menu.items()), "Intro, Guides[Setup, Usage]");
    }

    #[test]
    fn test_build_paths_start_with_mount() {
        let menu = MenuBuilder::new("/help")
            .build(&guides_site(), "pages")
            .unwrap();

        let guides = menu.items().get(2).unwrap();
        assert_eq!(guides.path, "/help/2 Guides");
        assert_eq!(
            guides.children.get(1).unwrap().path,
            "/help/2 Guides/1 Setup.md"
        );
        assert_eq!(
            guides.children.get(1).unwrap().href,
            "/help/2%20Guides/1%20Setup.md"
        );
        assert!(menu.contains("/help/1 Intro.md"));
    }

    #[test]
    fn test_build_order_ignores_listing_order() {
        let storage = MockStorage::new()
            .with_file("pages/10 Ten.md", "")
            .with_file("pages/2 Two.md", "")
            .with_file("pages/1 One.md", "")
            .with_file("pages/3 Dir/2 B.md", "")
            .with_file("pages/3 Dir/1 A.md", "");

        let forward = build(&storage).unwrap();
        let reversed = build(&storage.with_reversed_listing()).unwrap();

        assert_eq!(outline(forward.items()), "One, Two, Dir[A, B], Ten");
        assert_eq!(outline(reversed.items()), "One, Two, Dir[A, B], Ten");
    }

    #[test]
    fn test_build_sparse_orders_leave_placeholders() {
        let storage = MockStorage::new()
            .with_file("pages/0 First.md", "")
            .with_file("pages/3 Fourth.md", "");

        let menu = build(&storage).unwrap();

        assert_eq!(menu.items().slot_count(), 4);
        assert!(menu.items().get(1).is_none());
        assert!(menu.items().get(2).is_none());
        assert_eq!(outline(menu.items()), "First, Fourth");
    }

    #[test]
    fn test_build_skips_home_page_at_any_depth() {
        let storage = guides_site().with_file("pages/2 Guides/index.md", "# Guides");

        let menu = build(&storage).unwrap();

        assert_eq!(outline(menu.items()), "Intro, Guides[Setup, Usage]");
        assert!(!menu.contains("/index.md"));
    }

    #[test]
    fn test_build_skips_hidden_entries_and_subtrees() {
        let storage = guides_site()
            .with_file("pages/.draft.md", "")
            .with_file("pages/.git/config", "")
            .with_file("pages/.archive/Old Notes.md", "");

        let menu = build(&storage).unwrap();

        assert_eq!(outline(menu.items()), "Intro, Guides[Setup, Usage]");
    }

    #[test]
    fn test_build_skips_non_page_files() {
        let storage = guides_site()
            .with_file("pages/diagram.png", "")
            .with_file("pages/2 Guides/notes.txt", "");

        let menu = build(&storage).unwrap();

        assert_eq!(outline(menu.items()), "Intro, Guides[Setup, Usage]");
    }

    #[test]
    fn test_build_grammar_error_names_entry() {
        let storage = MockStorage::new()
            .with_file("pages/3 Notes.md", "")
            .with_file("pages/Notes2.md", "");

        let err = build(&storage).unwrap_err();

        assert!(matches!(
            &err,
            MenuError::Grammar { path, .. } if path == "Notes2.md"
        ));
        assert!(err.to_string().contains("Notes2.md"));
    }

    #[test]
    fn test_build_directory_without_order_fails() {
        let storage = MockStorage::new()
            .with_file("pages/1 Intro.md", "")
            .with_file("pages/Guides/1 Setup.md", "");

        let err = build(&storage).unwrap_err();

        assert!(matches!(
            &err,
            MenuError::Grammar { path, .. } if path == "Guides"
        ));
    }

    #[test]
    fn test_build_directory_label_keeps_dots() {
        let storage = MockStorage::new().with_file("pages/1 Release v1.md/1 Notes.md", "");

        let menu = build(&storage).unwrap();

        assert_eq!(outline(menu.items()), "Release v1.md[Notes]");
    }

    #[test]
    fn test_build_rejects_duplicate_order() {
        let storage = MockStorage::new()
            .with_file("pages/1 Intro.md", "")
            .with_file("pages/1 Overview.md", "");

        let err = build(&storage).unwrap_err();

        match err {
            MenuError::DuplicateOrder {
                order,
                existing,
                duplicate,
            } => {
                assert_eq!(order, 1);
                assert_eq!(existing, "/1 Intro.md");
                assert_eq!(duplicate, "/1 Overview.md");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_overwrite_keeps_later_entry() {
        let storage = MockStorage::new()
            .with_file("pages/1 Intro.md", "")
            .with_file("pages/1 Overview.md", "");

        let menu = MenuBuilder::new("/")
            .with_duplicate_order(DuplicateOrder::Overwrite)
            .build(&storage, "pages")
            .unwrap();

        assert_eq!(outline(menu.items()), "Overview");
    }

    #[test]
    fn test_build_drops_empty_directories() {
        let storage = guides_site()
            .with_dir("pages/3 Empty")
            .with_file("pages/4 Assets Only/logo.png", "");

        let menu = build(&storage).unwrap();

        assert_eq!(outline(menu.items()), "Intro, Guides[Setup, Usage]");
        assert!(!menu.contains("/3 Empty"));
    }

    #[test]
    fn test_build_empty_pages_dir() {
        let storage = MockStorage::new().with_file("pages/index.md", "# Home");

        let menu = build(&storage).unwrap();

        assert!(menu.is_empty());
    }

    #[test]
    fn test_build_missing_pages_dir() {
        let err = build(&MockStorage::new()).unwrap_err();

        assert!(matches!(err, MenuError::Walk(_)));
    }

    #[test]
    fn test_build_custom_extension_and_home() {
        let storage = MockStorage::new()
            .with_file("pages/README.markdown", "")
            .with_file("pages/1 Intro.markdown", "")
            .with_file("pages/2 Other.md", "");

        let menu = MenuBuilder::new("/")
            .with_home_page("README.markdown")
            .with_page_extension("markdown")
            .build(&storage, "pages")
            .unwrap();

        assert_eq!(outline(menu.items()), "Intro");
    }

    #[test]
    fn test_build_from_filesystem() {
        let temp_dir = tempfile::tempdir().unwrap();
        let pages = temp_dir.path().join("pages");
        std::fs::create_dir_all(pages.join("2 Guides")).unwrap();
        std::fs::write(pages.join("index.md"), "# Home").unwrap();
        std::fs::write(pages.join("1 Intro.md"), "# Intro").unwrap();
        std::fs::write(pages.join("2 Guides/2 Usage.md"), "# Usage").unwrap();
        std::fs::write(pages.join("2 Guides/1 Setup.md"), "# Setup").unwrap();

        let storage = kb_storage::FsStorage::new(temp_dir.path().to_path_buf());
        let menu = MenuBuilder::new("/").build(&storage, "pages").unwrap();

        assert_eq!(outline(menu.items()), "Intro, Guides[Setup, Usage]");
    }
}
