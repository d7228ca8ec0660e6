//! Scroll primitive - repeat a scroll step on the nearest scrollable node

use std::time::Duration;

use perceiver_structural::find_first;
use tracing::debug;

use screenpilot_core_types::{Action, ScrollDirection};

use crate::backend::{describe, AutomationBackend};
use crate::primitives::DefaultActionPrimitives;
use crate::types::ExecutionResult;

/// Execute scroll primitive
///
/// Steps:
/// 1. Map direction to a scroll step (up = backward, down = forward)
/// 2. Find the first node that is scrollable or supports that step
/// 3. Apply the step `amount` times, pausing between repetitions
pub async fn execute_scroll<B: AutomationBackend>(
    primitives: &DefaultActionPrimitives<B>,
    action: &Action,
    direction: ScrollDirection,
    amount: i64,
) -> ExecutionResult {
    let backend = primitives.backend();

    // 1. Step
    let step = direction.step();

    // 2. Target
    let target = backend
        .active_root()
        .and_then(|root| find_first(&root, |attributes| attributes.supports_scroll(step)));
    let Some(target) = target else {
        return ExecutionResult::failure(
            action,
            format!("No scrollable target available for {direction}."),
        );
    };
    debug!(target = %describe(&target), ?step, amount, "Scrolling");

    // 3. Repeat
    let delay = Duration::from_millis(primitives.config().scroll_step_delay_ms);
    for done in 0..amount {
        if done > 0 {
            tokio::time::sleep(delay).await;
        }
        if !backend.scroll_step(&target, step) {
            return ExecutionResult::failure(action, format!("Scroll failed after {done} step(s)."));
        }
    }

    ExecutionResult::success(action, format!("Scrolled {direction} x{amount}."))
}
