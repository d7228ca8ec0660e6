//! Loop Controller - per-response state machine.
//!
//! Takes one model response (decoded or raw) to exactly one [`LoopResult`]:
//! validate, then gate on confirmation, then dispatch on status. Holds no
//! state between calls; run memory lives in the runner.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use action_primitives::{ActionPrimitives, ExecutionResult};
use screenpilot_core_types::Action;

use crate::codec::{decode, DecodeResult};
use crate::protocol::{AgentResponse, AgentStatus, ValidationIssue};
use crate::response_validator::validate;

pub const DEFAULT_CONFIRMATION_PROMPT: &str = "Confirm action execution?";
pub const DEFAULT_CLARIFICATION_QUESTION: &str = "Please clarify your request.";
pub const DEFAULT_DONE_RESULT: &str = "Done.";
pub const DEFAULT_MODEL_ERROR: &str = "Model reported error status.";

/// Outcome of handling one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoopResult {
    DecodeFailed {
        reason: String,
        raw_json: Option<String>,
    },
    ValidationFailed {
        issues: Vec<ValidationIssue>,
    },
    /// Actions were withheld pending user confirmation.
    ConfirmationRequired {
        prompt: String,
        actions: Vec<Action>,
    },
    ClarificationRequired {
        question: String,
    },
    ActionsExecuted {
        results: Vec<ExecutionResult>,
        all_succeeded: bool,
    },
    Done {
        result: String,
    },
    ModelError {
        message: String,
    },
}

impl LoopResult {
    /// Variant name as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            LoopResult::DecodeFailed { .. } => "decode_failed",
            LoopResult::ValidationFailed { .. } => "validation_failed",
            LoopResult::ConfirmationRequired { .. } => "confirmation_required",
            LoopResult::ClarificationRequired { .. } => "clarification_required",
            LoopResult::ActionsExecuted { .. } => "actions_executed",
            LoopResult::Done { .. } => "done",
            LoopResult::ModelError { .. } => "model_error",
        }
    }
}

/// Stateless response handler bound to an executor.
#[derive(Clone)]
pub struct LoopController {
    executor: Arc<dyn ActionPrimitives>,
}

impl LoopController {
    pub fn new(executor: Arc<dyn ActionPrimitives>) -> Self {
        Self { executor }
    }

    /// Decode raw model text, then handle it like [`Self::handle_response`].
    pub async fn handle_model_output(&self, raw: &str, user_confirmed: bool) -> LoopResult {
        match decode(raw) {
            DecodeResult::Success(response) => self.handle_response(response, user_confirmed).await,
            DecodeResult::Failure { reason, raw_json } => {
                warn!(%reason, "Model output could not be decoded");
                LoopResult::DecodeFailed { reason, raw_json }
            }
        }
    }

    pub async fn handle_response(&self, response: AgentResponse, user_confirmed: bool) -> LoopResult {
        let issues = validate(&response);
        if !issues.is_empty() {
            warn!(issues = issues.len(), "Model response failed validation");
            return LoopResult::ValidationFailed { issues };
        }

        if response.needs_user_confirmation && !user_confirmed {
            debug!(actions = response.actions.len(), "Withholding actions until confirmed");
            return LoopResult::ConfirmationRequired {
                prompt: response
                    .confirmation_prompt
                    .unwrap_or_else(|| DEFAULT_CONFIRMATION_PROMPT.to_string()),
                actions: response.actions,
            };
        }

        match response.status {
            AgentStatus::InProgress => {
                let results = self.executor.execute_all(&response.actions).await;
                let all_succeeded = results.iter().all(|result| result.success);
                LoopResult::ActionsExecuted {
                    results,
                    all_succeeded,
                }
            }
            AgentStatus::NeedsClarification => LoopResult::ClarificationRequired {
                question: response
                    .question
                    .unwrap_or_else(|| DEFAULT_CLARIFICATION_QUESTION.to_string()),
            },
            AgentStatus::Done => LoopResult::Done {
                result: response
                    .result
                    .unwrap_or_else(|| DEFAULT_DONE_RESULT.to_string()),
            },
            AgentStatus::Error => LoopResult::ModelError {
                message: response
                    .result
                    .unwrap_or_else(|| DEFAULT_MODEL_ERROR.to_string()),
            },
        }
    }
}
