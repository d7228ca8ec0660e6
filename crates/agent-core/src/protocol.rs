//! Wire protocol between the model and the loop.

use std::fmt;

use serde::{Deserialize, Serialize};

use screenpilot_core_types::Action;

/// Status the model reports for its own response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    InProgress,
    NeedsClarification,
    Done,
    Error,
}

/// One decoded model response.
///
/// Decoding only checks shape; whether the fields fit `status` is the
/// validator's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AgentResponse {
    pub status: AgentStatus,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub needs_user_confirmation: bool,
    #[serde(default)]
    pub confirmation_prompt: Option<String>,
}

impl AgentResponse {
    fn with_status(status: AgentStatus) -> Self {
        Self {
            status,
            actions: Vec::new(),
            question: None,
            result: None,
            needs_user_confirmation: false,
            confirmation_prompt: None,
        }
    }

    pub fn in_progress(actions: Vec<Action>) -> Self {
        Self {
            actions,
            ..Self::with_status(AgentStatus::InProgress)
        }
    }

    pub fn done(result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
            ..Self::with_status(AgentStatus::Done)
        }
    }

    pub fn clarification(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            ..Self::with_status(AgentStatus::NeedsClarification)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: Some(message.into()),
            ..Self::with_status(AgentStatus::Error)
        }
    }

    /// Marks the response as needing user confirmation before execution.
    pub fn requiring_confirmation(mut self, prompt: impl Into<String>) -> Self {
        self.needs_user_confirmation = true;
        self.confirmation_prompt = Some(prompt.into());
        self
    }
}

/// A single protocol violation, keyed by field path (e.g. `actions[1].ms`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.message)
    }
}
