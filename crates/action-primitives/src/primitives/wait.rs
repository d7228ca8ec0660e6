//! Wait primitive - explicit sleep

use std::time::Duration;

use screenpilot_core_types::Action;

use crate::types::ExecutionResult;

/// Sleep for exactly `ms` milliseconds; negative durations fail.
pub async fn execute_wait(action: &Action, ms: i64) -> ExecutionResult {
    let Ok(duration) = u64::try_from(ms) else {
        return ExecutionResult::failure(action, "Wait duration cannot be negative.");
    };
    tokio::time::sleep(Duration::from_millis(duration)).await;
    ExecutionResult::success(action, format!("Waited {ms}ms."))
}
