use thiserror::Error;

/// Errors emitted by the agent-core crate.
///
/// Protocol and execution failures are not errors; they travel as
/// [`crate::LoopResult`] and [`crate::RunResult`] values.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Raised when a caller request is malformed or missing required fields.
    #[error("invalid agent request: {0}")]
    InvalidRequest(String),

    /// Raised by a model client when generation itself fails.
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// Raised when a run is started while another is still in flight.
    #[error("an agent run is already in progress")]
    RunInProgress,

    /// Raised when a response cannot be serialized for a scripted client.
    #[error("failed to encode agent response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AgentError {
    /// Helper for wrapping static string errors.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Helper for model transport/runtime failures.
    pub fn model(message: impl Into<String>) -> Self {
        Self::ModelInvocation(message.into())
    }
}
