//! Click primitive - resolve a selector against the live tree and click it

use tracing::debug;

use screenpilot_core_types::{Action, Selector};

use crate::backend::{describe, AutomationBackend};
use crate::primitives::DefaultActionPrimitives;
use crate::types::ExecutionResult;

/// Execute click primitive
///
/// Steps:
/// 1. Fetch the active root
/// 2. Resolve the selector (re-walks the tree, regenerating snapshot ids)
/// 3. Click the actionable node
///
/// Match metadata is attached whether or not the click succeeded.
pub fn execute_click<B: AutomationBackend>(
    primitives: &DefaultActionPrimitives<B>,
    action: &Action,
    selector: &Selector,
) -> ExecutionResult {
    // 1. Root
    let Some(root) = primitives.backend().active_root() else {
        return ExecutionResult::failure(action, "No active window root available.");
    };

    // 2. Resolve
    let Some(matched) = primitives.matcher().find_best_match(&root, selector) else {
        return ExecutionResult::failure(action, "No matching clickable node found for selector.");
    };
    debug!(
        target = %describe(&matched.node),
        snapshot_id = matched.matched_snapshot_id.as_deref().unwrap_or("-"),
        fallback = matched.used_ancestor_fallback,
        "Clicking resolved node"
    );

    // 3. Click
    let result = if primitives.backend().click(&matched.node) {
        ExecutionResult::success(action, "Click executed.")
    } else {
        ExecutionResult::failure(action, "Click action failed on matched node.")
    };
    result.with_match(matched.matched_snapshot_id, matched.used_ancestor_fallback)
}
