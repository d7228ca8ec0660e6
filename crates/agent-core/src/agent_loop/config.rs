//! Configuration for the run orchestrator and prompt builder.

use serde::{Deserialize, Serialize};

/// Configuration for a multi-step run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Maximum steps before the run ends with `MaxStepsReached`.
    /// Default: 8
    pub max_steps: u32,

    /// Pause after each executed step in milliseconds.
    /// Default: 450
    pub step_delay_ms: u64,

    /// Consecutive planner errors tolerated; one more ends the run.
    /// Default: 4
    pub max_consecutive_planner_errors: u32,

    /// Action trace entries kept for prompting.
    /// Default: 8
    pub trace_capacity: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_steps: 8,
            step_delay_ms: 450,
            max_consecutive_planner_errors: 4,
            trace_capacity: 8,
        }
    }
}

impl RunnerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config for tests: no inter-step delay.
    pub fn minimal() -> Self {
        Self {
            step_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn max_steps(mut self, steps: u32) -> Self {
        self.max_steps = steps;
        self
    }

    pub fn step_delay_ms(mut self, delay_ms: u64) -> Self {
        self.step_delay_ms = delay_ms;
        self
    }

    pub fn max_consecutive_planner_errors(mut self, errors: u32) -> Self {
        self.max_consecutive_planner_errors = errors;
        self
    }
}

/// How the prompt is framed for the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptFormat {
    /// System/user/model turn markers for instruction-tuned models.
    #[default]
    ChatTurns,
    /// Bare system and user sections.
    Plain,
}

/// Configuration for prompt construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Snapshot elements included in the compact context.
    /// Default: 12
    pub max_nodes: usize,

    /// Most recent feedback lines included.
    /// Default: 2
    pub max_feedback_items: usize,

    /// Most recent trace entries included, newest first.
    /// Default: 4
    pub max_recent_actions: usize,

    /// Default: chat_turns
    pub format: PromptFormat,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_nodes: 12,
            max_feedback_items: 2,
            max_recent_actions: 4,
            format: PromptFormat::ChatTurns,
        }
    }
}

impl PromptConfig {
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn format(mut self, format: PromptFormat) -> Self {
        self.format = format;
        self
    }
}
