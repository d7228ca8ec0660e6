//! In-memory UI tree.
//!
//! Backs simulated devices and tests. Nodes live in one arena behind a
//! shared lock so handles stay valid while the host mutates attributes.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use screenpilot_core_types::{Bounds, NodeAttributes, ScrollStep};

use crate::ports::UiNode;

/// Declarative description of a node and its subtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(flatten)]
    pub attributes: NodeAttributes,
    /// Opaque routing hint for the host, e.g. the screen a click leads to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn node() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.attributes.text = Some(text.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.attributes.accessible_label = Some(label.into());
        self
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.attributes.identifier = Some(identifier.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.attributes.class_name = Some(class_name.into());
        self
    }

    pub fn clickable(mut self) -> Self {
        self.attributes.clickable = true;
        self
    }

    pub fn editable(mut self) -> Self {
        self.attributes.editable = true;
        self.attributes.focusable = true;
        self
    }

    pub fn focused(mut self) -> Self {
        self.attributes.focused = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.attributes.enabled = false;
        self
    }

    pub fn scrollable(mut self) -> Self {
        self.attributes.scrollable = true;
        self
    }

    pub fn supports_scroll(mut self, step: ScrollStep) -> Self {
        self.attributes.scroll_actions.push(step);
        self
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.attributes.bounds = bounds;
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug)]
struct NodeData {
    attributes: NodeAttributes,
    link: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug, Default)]
struct Arena {
    nodes: Vec<NodeData>,
}

impl Arena {
    fn insert(&mut self, spec: &NodeSpec, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            attributes: spec.attributes.clone(),
            link: spec.link.clone(),
            parent,
            children: Vec::with_capacity(spec.children.len()),
        });
        for child in &spec.children {
            let child_index = self.insert(child, Some(index));
            self.nodes[index].children.push(child_index);
        }
        index
    }
}

/// A whole tree built from a [`NodeSpec`].
#[derive(Debug, Clone)]
pub struct MemoryTree {
    arena: Arc<RwLock<Arena>>,
}

impl MemoryTree {
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let mut arena = Arena::default();
        arena.insert(spec, None);
        Self {
            arena: Arc::new(RwLock::new(arena)),
        }
    }

    pub fn root(&self) -> MemoryNode {
        MemoryNode {
            arena: Arc::clone(&self.arena),
            index: 0,
        }
    }

    /// Clears input focus on every node.
    pub fn clear_focus(&self) {
        for node in self.arena.write().nodes.iter_mut() {
            node.attributes.focused = false;
        }
    }
}

/// Handle to one node of a [`MemoryTree`].
#[derive(Debug, Clone)]
pub struct MemoryNode {
    arena: Arc<RwLock<Arena>>,
    index: usize,
}

impl MemoryNode {
    fn handle(&self, index: usize) -> Self {
        Self {
            arena: Arc::clone(&self.arena),
            index,
        }
    }

    pub fn link(&self) -> Option<String> {
        self.arena.read().nodes[self.index].link.clone()
    }

    pub fn set_text(&self, text: &str) {
        self.update(|attributes| attributes.text = Some(text.to_string()));
    }

    pub fn update(&self, apply: impl FnOnce(&mut NodeAttributes)) {
        apply(&mut self.arena.write().nodes[self.index].attributes);
    }

    /// Whether both handles point at the same node of the same tree.
    pub fn same_node(&self, other: &MemoryNode) -> bool {
        Arc::ptr_eq(&self.arena, &other.arena) && self.index == other.index
    }
}

impl UiNode for MemoryNode {
    fn attributes(&self) -> NodeAttributes {
        self.arena.read().nodes[self.index].attributes.clone()
    }

    fn children(&self) -> Vec<Self> {
        let children = self.arena.read().nodes[self.index].children.clone();
        children.into_iter().map(|index| self.handle(index)).collect()
    }

    fn parent(&self) -> Option<Self> {
        let parent = self.arena.read().nodes[self.index].parent;
        parent.map(|index| self.handle(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_links_parent_and_children() {
        let tree = MemoryTree::from_spec(
            &NodeSpec::node()
                .identifier("root")
                .child(NodeSpec::node().text("first"))
                .child(NodeSpec::node().text("second").link("inbox")),
        );
        let root = tree.root();
        let children = root.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].link().as_deref(), Some("inbox"));

        let parent = children[0].parent().expect("parent");
        assert!(parent.same_node(&root));
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_mutation_is_visible_through_other_handles() {
        let tree = MemoryTree::from_spec(&NodeSpec::node().child(NodeSpec::node().editable()));
        let field = tree.root().children().remove(0);
        field.set_text("hi");
        field.update(|attrs| attrs.focused = true);

        let again = tree.root().children().remove(0);
        assert_eq!(again.attributes().text.as_deref(), Some("hi"));
        assert!(again.attributes().focused);

        tree.clear_focus();
        assert!(!again.attributes().focused);
    }

    #[test]
    fn test_spec_parses_flattened_attributes() {
        let spec: NodeSpec = serde_json::from_str(
            r#"{"text":"Messages","clickable":true,"link":"inbox","children":[{"text":"x"}]}"#,
        )
        .unwrap();
        assert!(spec.attributes.clickable);
        assert!(spec.attributes.enabled);
        assert_eq!(spec.children.len(), 1);
    }
}
