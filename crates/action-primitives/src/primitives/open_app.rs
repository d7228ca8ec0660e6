//! Open-app primitive - resolve a name to an app identifier and launch it

use tracing::{debug, warn};

use screenpilot_core_types::Action;

use crate::apps::resolve_app_identifier;
use crate::backend::AutomationBackend;
use crate::primitives::DefaultActionPrimitives;
use crate::types::ExecutionResult;

/// Execute open_app primitive
///
/// Launch errors from the backend are reported as a failed result.
pub fn execute_open_app<B: AutomationBackend>(
    primitives: &DefaultActionPrimitives<B>,
    action: &Action,
    name: &str,
) -> ExecutionResult {
    let name = name.trim();
    if name.is_empty() {
        return ExecutionResult::failure(action, "App name cannot be blank.");
    }

    let Some(identifier) = resolve_app_identifier(primitives.backend(), name) else {
        return ExecutionResult::failure(
            action,
            format!("Could not resolve launchable app for '{name}'."),
        );
    };

    debug!(app = name, %identifier, "Launching app");
    match primitives.backend().launch(&identifier) {
        Ok(()) => ExecutionResult::success(action, format!("Launched '{name}'.")),
        Err(err) => {
            warn!(app = name, %identifier, error = %err, "Launch failed");
            ExecutionResult::failure(action, format!("Failed to launch '{name}': {err}"))
        }
    }
}
