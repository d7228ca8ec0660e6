//! Agent core: the control loop between a small language model and a UI.
//!
//! Decodes and validates model output, executes the requested actions,
//! and drives multi-step runs to a terminal [`RunResult`].

pub mod agent_loop;
pub mod codec;
pub mod errors;
pub mod guardrails;
pub mod llm_provider;
pub mod protocol;
pub mod response_validator;
pub mod session;

pub use agent_loop::{
    AgentRunner, LoopController, LoopResult, PlannerStepHook, PlannerStepTrace, PromptBuilder,
    PromptConfig, PromptFormat, RunResult, RunnerConfig,
};
pub use codec::{decode, encode, extract_json_object, DecodeResult};
pub use errors::AgentError;
pub use guardrails::{AppTarget, GuardrailConfig, Guardrails};
pub use llm_provider::{
    HttpModelClient, HttpModelConfig, MockModelClient, ModelClient, ScriptedModelClient,
};
pub use protocol::{AgentResponse, AgentStatus, ValidationIssue};
pub use response_validator::validate;
pub use session::{AgentService, RunHandle, RunPermit};
