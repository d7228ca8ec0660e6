use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use action_primitives::DefaultActionPrimitives;
use agent_core::{AgentRunner, AgentService, ModelClient, ScriptedModelClient};
use perceiver_structural::StructuralPerceiverImpl;

use crate::config::AppConfig;
use crate::device::{DeviceFixture, SimulatedDevice};

/// Simulated device with the perceiver and executor wired over it.
pub struct DeviceContext {
    pub device: Arc<SimulatedDevice>,
    pub perceiver: Arc<StructuralPerceiverImpl<SimulatedDevice>>,
    pub executor: Arc<DefaultActionPrimitives<SimulatedDevice>>,
}

impl DeviceContext {
    pub async fn load(fixture_path: &Path, config: &AppConfig) -> Result<Self> {
        let fixture = DeviceFixture::load(fixture_path).await?;
        info!(
            fixture = %fixture_path.display(),
            screens = fixture.screens.len(),
            apps = fixture.apps.len(),
            "Loaded screen fixture"
        );
        let device = Arc::new(SimulatedDevice::new(fixture)?);
        Ok(Self::over(device, config))
    }

    pub fn over(device: Arc<SimulatedDevice>, config: &AppConfig) -> Self {
        let perceiver = Arc::new(StructuralPerceiverImpl::with_config(
            device.clone(),
            config.perceiver.clone(),
        ));
        let executor = Arc::new(DefaultActionPrimitives::with_config(
            device.clone(),
            config.executor.clone(),
        ));
        Self {
            device,
            perceiver,
            executor,
        }
    }

    /// Service over this device, configured from `config`.
    pub fn service(&self, model: Arc<dyn ModelClient>, config: &AppConfig) -> AgentService {
        self.service_with(model, config, |runner| runner)
    }

    pub fn service_with(
        &self,
        model: Arc<dyn ModelClient>,
        config: &AppConfig,
        customize: impl FnOnce(AgentRunner) -> AgentRunner,
    ) -> AgentService {
        let runner = AgentRunner::new(model, self.executor.clone(), self.perceiver.clone())
            .with_config(config.runner.clone())
            .with_prompt_config(config.prompt.clone())
            .with_guardrails(config.guardrails.clone());
        AgentService::new(customize(runner))
    }
}

/// Reads canned model outputs from a YAML or JSON list of strings.
pub async fn load_script(path: &Path) -> Result<ScriptedModelClient> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read model script {}", path.display()))?;
    let outputs: Vec<String> = serde_yaml::from_str(&content)
        .with_context(|| format!("Model script {} must be a list of strings", path.display()))?;
    Ok(ScriptedModelClient::new(outputs))
}
