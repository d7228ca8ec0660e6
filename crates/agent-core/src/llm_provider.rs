use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use url::Url;

use screenpilot_core_types::{Action, Selector};

use crate::codec::encode;
use crate::errors::AgentError;
use crate::protocol::AgentResponse;

/// Text generation capability behind the planner.
///
/// Loading weights and running inference are the implementor's business;
/// the loop only needs prompt in, text out.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError>;
}

/// Replays canned outputs in order, repeating the last one when exhausted.
#[derive(Debug)]
pub struct ScriptedModelClient {
    outputs: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedModelClient {
    pub fn new<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outputs: outputs.into_iter().map(Into::into).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn generate(&self, _prompt: &str) -> Result<String, AgentError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.outputs
            .get(index)
            .or_else(|| self.outputs.last())
            .cloned()
            .ok_or_else(|| AgentError::model("scripted model has no outputs"))
    }
}

/// Deterministic offline planner for demos.
///
/// Opens Instagram, clicks through to Messages, then reports done. Gives up
/// after six turns.
#[derive(Debug, Default)]
pub struct MockModelClient {
    turns: AtomicUsize,
}

impl MockModelClient {
    pub const MAX_TURNS: usize = 6;

    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        let turn = self.turns.fetch_add(1, Ordering::SeqCst) + 1;
        let in_instagram = prompt.contains("\"foregroundApp\":\"com.instagram.android\"");
        let has_messages = prompt.contains("\"text\":\"Messages\"")
            || prompt.contains("\"contentDesc\":\"Messages\"");

        let response = if turn > Self::MAX_TURNS {
            AgentResponse::done("Stopped after mock max turns.")
        } else if !in_instagram {
            AgentResponse::in_progress(vec![Action::open_app("Instagram"), Action::wait(900)])
        } else if has_messages {
            AgentResponse::in_progress(vec![
                Action::click(Selector::text("Messages")),
                Action::wait(600),
            ])
        } else {
            AgentResponse::done("Reached Instagram context in mock mode.")
        };
        debug!(turn, status = ?response.status, "Mock model response");
        encode(&response)
    }
}

/// Settings for [`HttpModelClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpModelConfig {
    /// Base URL of a llama.cpp-compatible server.
    /// Default: http://127.0.0.1:8080/
    pub endpoint: String,

    /// Maximum tokens to generate.
    /// Default: 256
    pub n_predict: u32,

    /// Default: 0.2
    pub temperature: f32,

    /// Stop sequences.
    /// Default: ["<end_of_turn>"]
    pub stop: Vec<String>,

    /// Request timeout in milliseconds.
    /// Default: 60000
    pub timeout_ms: u64,
}

impl Default for HttpModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/".to_string(),
            n_predict: 256,
            temperature: 0.2,
            stop: vec!["<end_of_turn>".to_string()],
            timeout_ms: 60_000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

/// Client for a `/completion` HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpModelClient {
    client: reqwest::Client,
    completion_url: Url,
    config: HttpModelConfig,
}

impl HttpModelClient {
    pub fn new(config: HttpModelConfig) -> Result<Self, AgentError> {
        let completion_url = completion_url(&config.endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| AgentError::model(format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            completion_url,
            config,
        })
    }

    pub fn completion_url(&self) -> &Url {
        &self.completion_url
    }
}

fn completion_url(endpoint: &str) -> Result<Url, AgentError> {
    let mut base = Url::parse(endpoint)
        .map_err(|err| AgentError::invalid_request(format!("invalid model endpoint '{endpoint}': {err}")))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("completion")
        .map_err(|err| AgentError::invalid_request(format!("invalid model endpoint '{endpoint}': {err}")))
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        let body = json!({
            "prompt": prompt,
            "n_predict": self.config.n_predict,
            "temperature": self.config.temperature,
            "stop": self.config.stop,
        });
        debug!(url = %self.completion_url, prompt_chars = prompt.len(), "Requesting completion");

        let response = self
            .client
            .post(self.completion_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| AgentError::model(err.to_string()))?
            .error_for_status()
            .map_err(|err| AgentError::model(err.to_string()))?;
        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|err| AgentError::model(format!("malformed completion body: {err}")))?;
        Ok(completion.content)
    }
}
