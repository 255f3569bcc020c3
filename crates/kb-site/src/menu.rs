//! Ordered menu tree.
//!
//! Siblings are addressed by the integer order parsed from their names. A
//! sibling group has `max(order) + 1` slots; slots nobody claimed are
//! placeholders that iteration skips.

use std::collections::{BTreeMap, HashMap};

/// Whether a node is a page link or a collapsible group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuNodeKind {
    /// Leaf linking to a page.
    Page,
    /// Interior node holding children.
    Group,
}

/// One entry of the menu tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuNode {
    /// Display label.
    pub label: String,
    /// Canonical path compared against the current request path.
    pub path: String,
    /// Link target written into `href`.
    pub href: String,
    /// Page or group.
    pub kind: MenuNodeKind,
    /// Ordered children (empty for pages).
    pub children: Children,
}

impl MenuNode {
    /// Page leaf whose link target is its path.
    #[must_use]
    pub fn page(label: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            label: label.into(),
            href: path.clone(),
            path,
            kind: MenuNodeKind::Page,
            children: Children::default(),
        }
    }

    /// Group whose children are numbered in the order given.
    #[must_use]
    pub fn group(
        label: impl Into<String>,
        path: impl Into<String>,
        children: impl IntoIterator<Item = MenuNode>,
    ) -> Self {
        let path = path.into();
        Self {
            label: label.into(),
            href: path.clone(),
            path,
            kind: MenuNodeKind::Group,
            children: Children::from_sequence(children),
        }
    }

    /// Replace the link target.
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = href.into();
        self
    }

    /// True for groups.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind == MenuNodeKind::Group
    }
}

/// Sparse, ordered sibling group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Children {
    slots: BTreeMap<u64, MenuNode>,
}

impl Children {
    /// Number the nodes 0, 1, 2... in iteration order.
    #[must_use]
    pub fn from_sequence(nodes: impl IntoIterator<Item = MenuNode>) -> Self {
        Self {
            slots: (0..).zip(nodes).collect(),
        }
    }

    /// Occupied slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuNode> {
        self.slots.values()
    }

    /// Occupied slots with their order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = (u64, &MenuNode)> {
        self.slots.iter().map(|(order, node)| (*order, node))
    }

    /// Every slot from 0 to the highest order, `None` for placeholders.
    pub fn slots(&self) -> impl Iterator<Item = Option<&MenuNode>> {
        (0..self.slot_count()).map(|order| self.slots.get(&order))
    }

    /// `max(order) + 1`, or 0 when empty.
    #[must_use]
    pub fn slot_count(&self) -> u64 {
        self.slots
            .last_key_value()
            .map_or(0, |(order, _)| order.saturating_add(1))
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Node at `order`, if the slot is occupied.
    #[must_use]
    pub fn get(&self, order: u64) -> Option<&MenuNode> {
        self.slots.get(&order)
    }

    pub(crate) fn get_mut(&mut self, order: u64) -> Option<&mut MenuNode> {
        self.slots.get_mut(&order)
    }

    /// Put `node` at `order`, returning the node it displaced.
    pub(crate) fn insert(&mut self, order: u64, node: MenuNode) -> Option<MenuNode> {
        self.slots.insert(order, node)
    }

    /// Drop groups that ended up without children, deepest first.
    pub(crate) fn prune_empty_groups(&mut self) {
        for node in self.slots.values_mut() {
            node.children.prune_empty_groups();
        }
        self.slots
            .retain(|_, node| !(node.is_group() && node.children.is_empty()));
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = &'a MenuNode;
    type IntoIter = std::collections::btree_map::Values<'a, u64, MenuNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.values()
    }
}

/// Ordered menu with a flat path lookup.
#[derive(Clone, Debug, Default)]
pub struct Menu {
    items: Children,
    /// Canonical path to the order chain from the root.
    index: HashMap<String, Vec<u64>>,
}

impl Menu {
    /// Wrap a finished tree and index it.
    #[must_use]
    pub fn new(items: Children) -> Self {
        let mut index = HashMap::new();
        let mut chain = Vec::new();
        index_children(&items, &mut chain, &mut index);
        Self { items, index }
    }

    /// Menu of the given nodes, numbered in order.
    #[must_use]
    pub fn from_nodes(nodes: impl IntoIterator<Item = MenuNode>) -> Self {
        Self::new(Children::from_sequence(nodes))
    }

    /// Top-level entries.
    #[must_use]
    pub fn items(&self) -> &Children {
        &self.items
    }

    /// Look up a node by canonical path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&MenuNode> {
        let chain = self.index.get(path)?;
        let (last, parents) = chain.split_last()?;
        let mut children = &self.items;
        for order in parents {
            children = &children.get(*order)?.children;
        }
        children.get(*last)
    }

    /// True when some node has this canonical path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Total number of nodes at every depth.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the menu has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn index_children(
    children: &Children,
    chain: &mut Vec<u64>,
    index: &mut HashMap<String, Vec<u64>>,
) {
    for (order, node) in children.iter_ordered() {
        chain.push(order);
        index.entry(node.path.clone()).or_insert_with(|| chain.clone());
        index_children(&node.children, chain, index);
        chain.pop();
    }
}
