use std::ops::ControlFlow;

use screenpilot_core_types::NodeAttributes;

use crate::ports::UiNode;

/// One node as seen by a traversal visitor.
pub struct Visit<'a, N> {
    pub node: &'a N,
    pub attributes: &'a NodeAttributes,
    /// `Some("nK")` when the node passed the interest predicate.
    pub snapshot_id: Option<&'a str>,
}

/// Default interest predicate: clickable, editable, or carrying visible text.
pub fn is_of_interest(attributes: &NodeAttributes) -> bool {
    attributes.clickable || attributes.editable || attributes.has_visible_text()
}

/// Depth-first pre-order walk over an explicit stack.
///
/// Children are pushed in reverse so the leftmost child is visited next.
/// Ids `n1, n2, ...` are handed out in visit order to nodes accepted by
/// `interest`; every node is visited whether or not it gets an id.
pub fn walk_tree<N, P, V>(root: &N, interest: P, mut visitor: V)
where
    N: UiNode,
    P: Fn(&NodeAttributes) -> bool,
    V: FnMut(Visit<'_, N>) -> ControlFlow<()>,
{
    let mut stack = vec![root.clone()];
    let mut next_id = 1usize;

    while let Some(node) = stack.pop() {
        let attributes = node.attributes();
        let snapshot_id = if interest(&attributes) {
            let id = format!("n{next_id}");
            next_id += 1;
            Some(id)
        } else {
            None
        };

        let flow = visitor(Visit {
            node: &node,
            attributes: &attributes,
            snapshot_id: snapshot_id.as_deref(),
        });
        if flow.is_break() {
            return;
        }

        let mut children = node.children();
        children.reverse();
        stack.extend(children);
    }
}

/// First node in traversal order whose attributes satisfy `predicate`.
pub fn find_first<N, F>(root: &N, predicate: F) -> Option<N>
where
    N: UiNode,
    F: Fn(&NodeAttributes) -> bool,
{
    let mut found = None;
    walk_tree(root, is_of_interest, |visit| {
        if predicate(visit.attributes) {
            found = Some(visit.node.clone());
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryTree, NodeSpec};

    fn sample_tree() -> MemoryTree {
        // root
        // ├── a (clickable)
        // │   ├── a1 (text)
        // │   └── a2 (plain)
        // └── b (editable)
        MemoryTree::from_spec(
            &NodeSpec::node()
                .child(
                    NodeSpec::node()
                        .identifier("a")
                        .clickable()
                        .child(NodeSpec::node().identifier("a1").text("hello"))
                        .child(NodeSpec::node().identifier("a2")),
                )
                .child(NodeSpec::node().identifier("b").editable()),
        )
    }

    #[test]
    fn test_walk_is_preorder_left_to_right() {
        let tree = sample_tree();
        let mut order = Vec::new();
        walk_tree(&tree.root(), is_of_interest, |visit| {
            order.push((
                visit.attributes.identifier.clone().unwrap_or_default(),
                visit.snapshot_id.map(str::to_string),
            ));
            ControlFlow::Continue(())
        });

        assert_eq!(
            order,
            vec![
                (String::new(), None),
                ("a".to_string(), Some("n1".to_string())),
                ("a1".to_string(), Some("n2".to_string())),
                ("a2".to_string(), None),
                ("b".to_string(), Some("n3".to_string())),
            ]
        );
    }

    #[test]
    fn test_walk_stops_on_break() {
        let tree = sample_tree();
        let mut visited = 0;
        walk_tree(&tree.root(), is_of_interest, |_| {
            visited += 1;
            if visited == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_find_first_editable() {
        let tree = sample_tree();
        let found = find_first(&tree.root(), NodeAttributes::is_editable_target)
            .expect("editable node");
        assert_eq!(found.attributes().identifier.as_deref(), Some("b"));
        assert!(find_first(&tree.root(), |attrs| attrs.scrollable).is_none());
    }
}
