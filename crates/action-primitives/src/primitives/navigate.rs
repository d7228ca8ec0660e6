//! Navigation primitive - global back/home

use screenpilot_core_types::{Action, NavigationKind};

use crate::backend::AutomationBackend;
use crate::primitives::DefaultActionPrimitives;
use crate::types::ExecutionResult;

/// Execute a global navigation primitive; the result mirrors the backend's answer.
pub fn execute_navigation<B: AutomationBackend>(
    primitives: &DefaultActionPrimitives<B>,
    action: &Action,
    kind: NavigationKind,
) -> ExecutionResult {
    if primitives.backend().global_navigation(kind) {
        ExecutionResult::success(action, format!("Global '{kind}' executed."))
    } else {
        ExecutionResult::failure(action, format!("Global '{kind}' failed."))
    }
}
