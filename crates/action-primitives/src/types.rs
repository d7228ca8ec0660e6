//! Core types for action execution

use serde::{Deserialize, Serialize};

use screenpilot_core_types::Action;

/// Outcome of one executed action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub action: Action,
    pub success: bool,
    pub message: String,
    /// Snapshot id of the node a click selector matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_element_id: Option<String>,
    pub used_ancestor_fallback: bool,
}

impl ExecutionResult {
    pub fn success(action: &Action, message: impl Into<String>) -> Self {
        Self::new(action, true, message)
    }

    pub fn failure(action: &Action, message: impl Into<String>) -> Self {
        Self::new(action, false, message)
    }

    fn new(action: &Action, success: bool, message: impl Into<String>) -> Self {
        Self {
            action: action.clone(),
            success,
            message: message.into(),
            matched_element_id: None,
            used_ancestor_fallback: false,
        }
    }

    pub fn with_match(mut self, matched_element_id: Option<String>, used_ancestor_fallback: bool) -> Self {
        self.matched_element_id = matched_element_id;
        self.used_ancestor_fallback = used_ancestor_fallback;
        self
    }
}

/// Entry of the platform's launchable-app registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchableApp {
    pub label: String,
    pub identifier: String,
}

impl LaunchableApp {
    pub fn new(label: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            identifier: identifier.into(),
        }
    }
}

/// Executor tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Pause between repeated scroll steps in milliseconds.
    /// Default: 160
    pub scroll_step_delay_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            scroll_step_delay_ms: 160,
        }
    }
}

impl ExecutorConfig {
    pub fn scroll_step_delay_ms(mut self, delay_ms: u64) -> Self {
        self.scroll_step_delay_ms = delay_ms;
        self
    }
}
