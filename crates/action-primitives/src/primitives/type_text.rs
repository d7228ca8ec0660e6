//! Type-text primitive - set text on an editable node

use perceiver_structural::{find_first, UiNode};
use tracing::debug;

use screenpilot_core_types::{Action, NodeAttributes};

use crate::backend::{describe, AutomationBackend};
use crate::primitives::DefaultActionPrimitives;
use crate::types::ExecutionResult;

/// Execute type_text primitive
///
/// Steps:
/// 1. Prefer the input-focused node when it is an enabled editable
/// 2. Otherwise take the first enabled editable node in traversal order
/// 3. Focus it if needed, then set the text
pub fn execute_type_text<B: AutomationBackend>(
    primitives: &DefaultActionPrimitives<B>,
    action: &Action,
    text: &str,
) -> ExecutionResult {
    let backend = primitives.backend();

    // 1-2. Target
    let target = backend
        .input_focus()
        .filter(|node| node.attributes().is_editable_target())
        .or_else(|| {
            backend
                .active_root()
                .and_then(|root| find_first(&root, NodeAttributes::is_editable_target))
        });
    let Some(target) = target else {
        return ExecutionResult::failure(action, "No editable target is focused or visible.");
    };

    // 3. Focus and set
    if !target.attributes().focused {
        debug!(target = %describe(&target), "Focusing editable node");
        backend.focus(&target);
    }
    if backend.set_text(&target, text) {
        ExecutionResult::success(action, "Text entered into editable field.")
    } else {
        ExecutionResult::failure(action, "Failed to set text in editable field.")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use perceiver_structural::NodeSpec;
    use screenpilot_core_types::Action;

    use crate::primitives::test_support::FakeBackend;
    use crate::primitives::{ActionPrimitives, DefaultActionPrimitives};

    #[tokio::test]
    async fn test_focused_editable_is_preferred() {
        let spec = NodeSpec::node()
            .child(NodeSpec::node().identifier("search").editable())
            .child(NodeSpec::node().identifier("compose").editable().focused());
        let backend = Arc::new(FakeBackend::new(spec));
        let primitives = DefaultActionPrimitives::new(Arc::clone(&backend));

        let result = primitives.execute(&Action::type_text("hello")).await;
        assert!(result.success);
        assert_eq!(result.message, "Text entered into editable field.");
        assert_eq!(backend.calls(), vec!["set_text:compose:hello"]);
    }

    #[tokio::test]
    async fn test_first_enabled_editable_is_focused_first() {
        let spec = NodeSpec::node()
            .child(NodeSpec::node().identifier("locked").editable().disabled())
            .child(NodeSpec::node().identifier("search").editable());
        let backend = Arc::new(FakeBackend::new(spec));
        let primitives = DefaultActionPrimitives::new(Arc::clone(&backend));

        assert!(primitives.execute(&Action::type_text("cats")).await.success);
        assert_eq!(
            backend.calls(),
            vec!["focus:search", "set_text:search:cats"]
        );
    }

    #[tokio::test]
    async fn test_missing_or_failing_editable() {
        let backend = Arc::new(FakeBackend::new(NodeSpec::node().child(NodeSpec::node().text("x"))));
        let primitives = DefaultActionPrimitives::new(backend);
        let result = primitives.execute(&Action::type_text("hi")).await;
        assert_eq!(result.message, "No editable target is focused or visible.");

        let mut backend = FakeBackend::new(NodeSpec::node().child(NodeSpec::node().editable()));
        backend.set_text_ok = false;
        let primitives = DefaultActionPrimitives::new(Arc::new(backend));
        let result = primitives.execute(&Action::type_text("hi")).await;
        assert!(!result.success);
        assert_eq!(result.message, "Failed to set text in editable field.");
    }
}
