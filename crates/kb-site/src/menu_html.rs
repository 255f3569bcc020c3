//! Menu HTML serialization.

use std::fmt::Write;

use kb_renderer::escape_html;

use crate::menu::{Children, Menu, MenuNodeKind};

/// Classes of an inactive menu entry.
pub const MENU_CLASSES: &str = "menu-item";
/// Classes of the entry matching the current page.
pub const MENU_CLASSES_ACTIVE: &str = "menu-item active";

/// Render a sibling group.
///
/// Pages become links, groups become `<details>` elements that are expanded
/// when they or any descendant match `current_path`. Returns the markup and
/// whether anything inside matched.
pub fn render_menu(children: &Children, current_path: &str) -> (String, bool) {
    let mut html = String::new();
    let mut any_active = false;

    for node in children {
        if node.label.is_empty() {
            continue;
        }

        let self_active = node.path == current_path;
        let classes = if self_active {
            MENU_CLASSES_ACTIVE
        } else {
            MENU_CLASSES
        };

        match node.kind {
            MenuNodeKind::Page => {
                write!(
                    html,
                    "<a class=\"{classes}\" href=\"{}\">{}</a>",
                    escape_html(&node.href),
                    escape_html(&node.label),
                )
                .unwrap();
                any_active |= self_active;
            }
            MenuNodeKind::Group => {
                let (inner, child_active) = render_menu(&node.children, current_path);
                let open = if self_active || child_active {
                    " open"
                } else {
                    ""
                };
                write!(
                    html,
                    "<details{open} class=\"{classes}\"><summary>{}</summary>{inner}</details>\n",
                    escape_html(&node.label),
                )
                .unwrap();
                any_active |= self_active || child_active;
            }
        }
    }

    (html, any_active)
}

/// Full navigation markup: the base menu followed by the generated menu.
pub fn menu_html(base_menu: &Menu, menu: &Menu, current_path: &str) -> String {
    let (mut html, _) = render_menu(base_menu.items(), current_path);
    let (generated, _) = render_menu(menu.items(), current_path);
    html.push_str(&generated);
    html
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::menu::MenuNode;

    fn deep_menu() -> Menu {
        Menu::from_nodes([
            MenuNode::page("Intro", "/1 Intro.md"),
            MenuNode::group(
                "Guides",
                "/2 Guides",
                [MenuNode::group(
                    "Advanced",
                    "/2 Guides/1 Advanced",
                    [MenuNode::page("Tuning", "/2 Guides/1 Advanced/1 Tuning.md")],
                )],
            ),
        ])
    }

    #[test]
    fn test_render_leaf() {
        let menu = Menu::from_nodes([MenuNode::page("Intro", "/1 Intro.md")
            .with_href("/1%20Intro.md")]);

        let (html, active) = render_menu(menu.items(), "/other");

        assert_eq!(html, "<a class=\"menu-item\" href=\"/1%20Intro.md\">Intro</a>");
        assert!(!active);
    }

    #[test]
    fn test_render_active_leaf() {
        let menu = Menu::from_nodes([MenuNode::page("Intro", "/1 Intro.md")]);

        let (html, active) = render_menu(menu.items(), "/1 Intro.md");

        assert_eq!(
            html,
            "<a class=\"menu-item active\" href=\"/1 Intro.md\">Intro</a>"
        );
        assert!(active);
    }

    #[test]
    fn test_render_collapsed_group() {
        let (html, active) = render_menu(deep_menu().items(), "/1 Intro.md");

        assert!(active);
        assert_eq!(
            html,
            "<a class=\"menu-item active\" href=\"/1 Intro.md\">Intro</a>\
             <details class=\"menu-item\"><summary>Guides</summary>\
             <details class=\"menu-item\"><summary>Advanced</summary>\
             <a class=\"menu-item\" href=\"/2 Guides/1 Advanced/1 Tuning.md\">Tuning</a>\
             </details>\n</details>\n"
        );
    }

    #[test]
    fn test_render_expands_every_ancestor() {
        let (html, active) = render_menu(deep_menu().items(), "/2 Guides/1 Advanced/1 Tuning.md");

        assert!(active);
        assert_eq!(html.matches("<details open").count(), 2);
        assert!(html.contains("<a class=\"menu-item active\""));
    }

    #[test]
    fn test_render_skips_placeholders_and_keeps_order() {
        let mut children = Children::default();
        children.insert(3, MenuNode::page("Three", "/3"));
        children.insert(0, MenuNode::page("Zero", "/0"));

        let (html, _) = render_menu(&children, "");

        assert_eq!(
            html,
            "<a class=\"menu-item\" href=\"/0\">Zero</a><a class=\"menu-item\" href=\"/3\">Three</a>"
        );
    }

    #[test]
    fn test_render_escapes_labels_and_links() {
        let menu = Menu::from_nodes([MenuNode::page("<b>Q&A</b>", "/a?x=1&y=2")]);

        let (html, _) = render_menu(menu.items(), "");

        assert_eq!(
            html,
            "<a class=\"menu-item\" href=\"/a?x=1&amp;y=2\">&lt;b&gt;Q&amp;A&lt;/b&gt;</a>"
        );
    }

    #[test]
    fn test_menu_html_base_menu_first() {
        let base = Menu::from_nodes([MenuNode::page("Back to app", "https://example.com")]);

        let html = menu_html(&base, &deep_menu(), "/1 Intro.md");

        assert!(html.starts_with("<a class=\"menu-item\" href=\"https://example.com\">Back to app</a>"));
        assert!(html.contains("<a class=\"menu-item active\" href=\"/1 Intro.md\">Intro</a>"));
    }

    #[test]
    fn test_menu_html_base_menu_can_be_active() {
        let base = Menu::from_nodes([MenuNode::page("Home", "/")]);

        let html = menu_html(&base, &Menu::default(), "/");

        assert_eq!(html, "<a class=\"menu-item active\" href=\"/\">Home</a>");
    }
}
