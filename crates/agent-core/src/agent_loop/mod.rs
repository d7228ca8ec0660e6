//! Agent loop: per-response control and the multi-step run.
//!
//! # Architecture
//!
//! ```text
//! for step in 1..=max_steps:
//!     snapshot = perceiver.capture()
//!     prompt   = PromptBuilder::build(goal, snapshot, history)
//!     raw      = model.generate(prompt)
//!     outcome  = LoopController::handle_model_output(raw)
//!     fold outcome into run state, or finish
//! ```
//!
//! # Key Components
//!
//! - [`LoopController`]: validate, confirm, dispatch one response
//! - [`PromptBuilder`]: compact screen context plus feedback and trace
//! - [`AgentRunner`]: bootstrap, guard, error budget, termination

pub mod config;
pub mod controller;
pub mod prompt;
pub mod runner;
pub mod trace;

pub use config::{PromptConfig, PromptFormat, RunnerConfig};
pub use controller::{LoopController, LoopResult};
pub use prompt::{PromptBuilder, PromptInput, AGENT_SYSTEM_PROMPT, RETRY_RULE};
pub use runner::{AgentRunner, PlannerStepHook, PlannerStepTrace, RunResult};
pub use trace::{action_trace, feedback_line, trace_entry, trim_for_trace, TraceRing};
