//! Run Orchestrator - drives snapshot, prompt, model and controller cycles.
//!
//! # Step
//!
//! ```text
//! snapshot = perceiver.capture()            // none => Failed
//! if step 1 and goal names an app not open: // bootstrap, no model call
//!     fold(controller.handle(open_app))
//! prompt = builder.build(goal, snapshot, feedback, trace, last_error)
//! raw = model.generate(prompt)              // error => Failed
//! fold(controller.handle_model_output(raw)) // may end the run
//! if consecutive_errors > budget: Failed
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use action_primitives::{ActionPrimitives, ExecutionResult};
use perceiver_structural::StructuralPerceiver;
use screenpilot_core_types::{Action, RunId, Snapshot};

use super::config::{PromptConfig, RunnerConfig};
use super::controller::{LoopController, LoopResult};
use super::prompt::{PromptBuilder, PromptInput};
use super::trace::{feedback_line, trace_entry, TraceRing};
use crate::guardrails::{GuardrailConfig, Guardrails};
use crate::llm_provider::ModelClient;
use crate::protocol::AgentResponse;

pub const NO_SCREEN_CONTEXT: &str = "No active screen context available.";
pub const MODEL_GENERATION_FAILED: &str = "Model generation failed.";
pub const REPEATED_PLANNER_ERRORS: &str = "Stopped after repeated planner errors.";
pub const DONE_REJECTED: &str = "done_rejected: goal does not appear satisfied from current context.";

/// Terminal outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunResult {
    Completed { result: String },
    NeedsClarification { question: String },
    NeedsConfirmation { prompt: String },
    MaxStepsReached { max_steps: u32 },
    Failed {
        reason: String,
        last_error: Option<String>,
    },
}

impl RunResult {
    pub fn failed(reason: impl Into<String>, last_error: Option<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            last_error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Completed { .. })
    }
}

/// What the model saw and said on one planning step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerStepTrace {
    pub step: u32,
    pub prompt: String,
    pub raw_model_output: String,
    pub at: DateTime<Utc>,
}

/// Callback invoked after every model call.
pub type PlannerStepHook = Arc<dyn Fn(&PlannerStepTrace) + Send + Sync>;

/// Memory of one run; dropped when the run ends.
struct RunState {
    feedback: Vec<String>,
    trace: TraceRing,
    last_error: Option<String>,
    consecutive_planner_errors: u32,
    successful_actions: usize,
}

impl RunState {
    fn new(trace_capacity: usize) -> Self {
        Self {
            feedback: Vec::new(),
            trace: TraceRing::new(trace_capacity),
            last_error: None,
            consecutive_planner_errors: 0,
            successful_actions: 0,
        }
    }

    fn record_execution(&mut self, step: u32, results: &[ExecutionResult], all_succeeded: bool) {
        self.feedback.push(feedback_line(step, results));
        self.fold_results(step, results, all_succeeded);
    }

    /// Counters, trace and `last_error`, without a feedback line.
    fn fold_results(&mut self, step: u32, results: &[ExecutionResult], all_succeeded: bool) {
        self.consecutive_planner_errors = 0;
        for result in results {
            self.trace.push(trace_entry(step, result));
        }
        self.successful_actions += results.iter().filter(|result| result.success).count();
        self.last_error = if all_succeeded {
            None
        } else {
            Some(
                results
                    .iter()
                    .filter(|result| !result.success)
                    .map(|result| result.message.as_str())
                    .collect::<Vec<_>>()
                    .join(" | "),
            )
        };
    }

    fn record_planner_error(&mut self, step: u32, summary: String) {
        self.consecutive_planner_errors += 1;
        self.feedback.push(format!("step {step}: {summary}"));
        self.last_error = Some(summary);
    }
}

/// Summary recorded for an error-like loop result, if it is one.
fn planner_error_summary(result: &LoopResult) -> Option<String> {
    match result {
        LoopResult::DecodeFailed { reason, .. } => Some(format!("decode_failed: {reason}")),
        LoopResult::ValidationFailed { issues } => Some(format!(
            "validation_failed: {}",
            issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )),
        LoopResult::ModelError { message } => Some(format!("model_error: {message}")),
        _ => None,
    }
}

/// Multi-step agent run orchestrator.
pub struct AgentRunner {
    model: Arc<dyn ModelClient>,
    perceiver: Arc<dyn StructuralPerceiver>,
    controller: LoopController,
    prompt_builder: PromptBuilder,
    guardrails: Guardrails,
    config: RunnerConfig,
    observer: Option<PlannerStepHook>,
}

impl AgentRunner {
    pub fn new(
        model: Arc<dyn ModelClient>,
        executor: Arc<dyn ActionPrimitives>,
        perceiver: Arc<dyn StructuralPerceiver>,
    ) -> Self {
        Self {
            model,
            perceiver,
            controller: LoopController::new(executor),
            prompt_builder: PromptBuilder::default(),
            guardrails: Guardrails::default(),
            config: RunnerConfig::default(),
            observer: None,
        }
    }

    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_prompt_config(mut self, config: PromptConfig) -> Self {
        self.prompt_builder = PromptBuilder::new(config);
        self
    }

    pub fn with_guardrails(mut self, config: GuardrailConfig) -> Self {
        self.guardrails = Guardrails::new(config);
        self
    }

    pub fn with_observer(mut self, observer: PlannerStepHook) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn controller(&self) -> &LoopController {
        &self.controller
    }

    /// Single-shot protocol entry: decode, validate and execute one output.
    pub async fn handle_model_output(&self, raw: &str, user_confirmed: bool) -> LoopResult {
        self.controller.handle_model_output(raw, user_confirmed).await
    }

    pub async fn run(&self, goal: &str, user_confirmed: bool) -> RunResult {
        self.run_with_id(&RunId::new(), goal, user_confirmed).await
    }

    pub async fn run_with_id(&self, run_id: &RunId, goal: &str, user_confirmed: bool) -> RunResult {
        info!(%run_id, goal, max_steps = self.config.max_steps, "Starting agent run");
        let result = self.drive(goal, user_confirmed).await;
        match &result {
            RunResult::Failed { reason, last_error } => warn!(
                %run_id,
                %reason,
                last_error = last_error.as_deref().unwrap_or("-"),
                "Agent run failed"
            ),
            other => info!(%run_id, outcome = ?other, "Agent run finished"),
        }
        result
    }

    async fn drive(&self, goal: &str, user_confirmed: bool) -> RunResult {
        let mut state = RunState::new(self.config.trace_capacity);
        let step_delay = Duration::from_millis(self.config.step_delay_ms);

        for step in 1..=self.config.max_steps {
            // 1. Observe
            let Some(snapshot) = self.perceiver.capture_snapshot() else {
                return RunResult::failed(NO_SCREEN_CONTEXT, None);
            };
            debug!(step, elements = snapshot.elements.len(), "Observed screen");

            // 2. Bootstrap
            if let Some(outcome) = self
                .bootstrap(goal, step, &snapshot, user_confirmed, &mut state)
                .await
            {
                match outcome {
                    BootstrapOutcome::Finished(result) => return result,
                    BootstrapOutcome::Executed => {
                        tokio::time::sleep(step_delay).await;
                        continue;
                    }
                    BootstrapOutcome::Errored => {}
                }
            }

            // 3. Prompt
            let prompt = self.prompt_builder.build(&PromptInput {
                goal,
                step,
                snapshot: Some(&snapshot),
                feedback: &state.feedback,
                recent_actions: &state.trace.entries(),
                last_error: state.last_error.as_deref(),
            });

            // 4. Plan
            let raw = match self.model.generate(&prompt).await {
                Ok(raw) => raw,
                Err(err) => {
                    return RunResult::failed(MODEL_GENERATION_FAILED, Some(err.to_string()));
                }
            };
            if let Some(observer) = &self.observer {
                observer(&PlannerStepTrace {
                    step,
                    prompt,
                    raw_model_output: raw.clone(),
                    at: Utc::now(),
                });
            }

            // 5. Act
            let outcome = self.controller.handle_model_output(&raw, user_confirmed).await;
            debug!(step, outcome = outcome.kind(), "Handled model output");
            match outcome {
                LoopResult::ActionsExecuted {
                    results,
                    all_succeeded,
                } => {
                    state.record_execution(step, &results, all_succeeded);
                    tokio::time::sleep(step_delay).await;
                }
                LoopResult::ClarificationRequired { question } => {
                    return RunResult::NeedsClarification { question };
                }
                LoopResult::ConfirmationRequired { prompt, .. } => {
                    return RunResult::NeedsConfirmation { prompt };
                }
                LoopResult::Done { result } => {
                    if !self
                        .guardrails
                        .should_reject_done(goal, state.successful_actions, &snapshot)
                    {
                        return RunResult::Completed { result };
                    }
                    warn!(step, "Rejecting done without observable progress");
                    state.record_planner_error(step, DONE_REJECTED.to_string());
                    continue;
                }
                error => {
                    if let Some(summary) = planner_error_summary(&error) {
                        warn!(step, %summary, "Planner error");
                        state.record_planner_error(step, summary);
                    }
                }
            }

            // 6. Budget
            if state.consecutive_planner_errors > self.config.max_consecutive_planner_errors {
                return RunResult::failed(REPEATED_PLANNER_ERRORS, state.last_error);
            }
        }

        RunResult::MaxStepsReached {
            max_steps: self.config.max_steps,
        }
    }

    async fn bootstrap(
        &self,
        goal: &str,
        step: u32,
        snapshot: &Snapshot,
        user_confirmed: bool,
        state: &mut RunState,
    ) -> Option<BootstrapOutcome> {
        let target = self
            .guardrails
            .bootstrap_target(goal, step, state.successful_actions, snapshot)?;
        let app = target.display_name.clone();
        info!(step, %app, "Bootstrapping goal app without a model call");

        let label = format!("step {step}: bootstrap open_app({app})");
        state.feedback.push(label.clone());
        state.trace.push(label);

        let response = AgentResponse::in_progress(vec![Action::open_app(app)]);
        let outcome = match self.controller.handle_response(response, user_confirmed).await {
            LoopResult::ActionsExecuted {
                results,
                all_succeeded,
            } => {
                state.fold_results(step, &results, all_succeeded);
                BootstrapOutcome::Executed
            }
            LoopResult::ClarificationRequired { question } => {
                BootstrapOutcome::Finished(RunResult::NeedsClarification { question })
            }
            LoopResult::ConfirmationRequired { prompt, .. } => {
                BootstrapOutcome::Finished(RunResult::NeedsConfirmation { prompt })
            }
            LoopResult::Done { result } => BootstrapOutcome::Finished(RunResult::Completed { result }),
            error => {
                if let Some(summary) = planner_error_summary(&error) {
                    state.record_planner_error(step, summary);
                }
                BootstrapOutcome::Errored
            }
        };
        Some(outcome)
    }
}

enum BootstrapOutcome {
    /// Ends the run.
    Finished(RunResult),
    /// Actions ran; move to the next step.
    Executed,
    /// Counted as a planner error; the model is consulted this step.
    Errored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_error_summaries() {
        let decode = LoopResult::DecodeFailed {
            reason: "No JSON object found in model output.".into(),
            raw_json: None,
        };
        assert_eq!(
            planner_error_summary(&decode).as_deref(),
            Some("decode_failed: No JSON object found in model output.")
        );

        let validation = LoopResult::ValidationFailed {
            issues: vec![
                crate::ValidationIssue::new("actions", "a"),
                crate::ValidationIssue::new("actions[0].ms", "b"),
            ],
        };
        assert_eq!(
            planner_error_summary(&validation).as_deref(),
            Some("validation_failed: actions:a, actions[0].ms:b")
        );
        assert!(planner_error_summary(&LoopResult::Done { result: "x".into() }).is_none());
    }

    #[test]
    fn test_execution_updates_state() {
        let mut state = RunState::new(8);
        state.consecutive_planner_errors = 2;
        let results = vec![
            ExecutionResult::success(&Action::Back {}, "Global 'back' executed."),
            ExecutionResult::failure(&Action::Home {}, "Global 'home' failed."),
        ];
        state.record_execution(4, &results, false);

        assert_eq!(state.consecutive_planner_errors, 0);
        assert_eq!(state.successful_actions, 1);
        assert_eq!(state.last_error.as_deref(), Some("Global 'home' failed."));
        assert_eq!(
            state.trace.entries(),
            vec!["step 4: back() => ok", "step 4: home() => fail"]
        );

        state.record_execution(5, &results[..1], true);
        assert!(state.last_error.is_none());
        assert_eq!(state.feedback.len(), 2);
    }

    #[test]
    fn test_fold_results_leaves_feedback_untouched() {
        let mut state = RunState::new(8);
        state.consecutive_planner_errors = 1;
        let results = vec![ExecutionResult::failure(&Action::open_app("Instagram"), "no launch intent")];
        state.fold_results(1, &results, false);

        assert!(state.feedback.is_empty());
        assert_eq!(state.consecutive_planner_errors, 0);
        assert_eq!(state.last_error.as_deref(), Some("no launch intent"));
        assert_eq!(state.trace.entries().len(), 1);
    }
}
