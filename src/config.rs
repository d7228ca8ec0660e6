//! Application configuration
//!
//! One YAML document with a section per component. Every section is
//! optional and falls back to the component's defaults.

use serde::{Deserialize, Serialize};

use action_primitives::ExecutorConfig;
use agent_core::{GuardrailConfig, HttpModelConfig, PromptConfig, RunnerConfig};
use perceiver_structural::PerceiverConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub runner: RunnerConfig,
    pub prompt: PromptConfig,
    pub perceiver: PerceiverConfig,
    pub executor: ExecutorConfig,
    pub guardrails: GuardrailConfig,
    pub model: HttpModelConfig,
}

impl AppConfig {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = AppConfig::from_yaml(
            r#"
runner:
  max_steps: 3
model:
  endpoint: http://10.0.2.2:8080/
guardrails:
  app_targets:
    - keyword: maps
      display_name: Maps
"#,
        )
        .expect("parse");

        assert_eq!(config.runner.max_steps, 3);
        assert_eq!(config.runner.max_consecutive_planner_errors, 4);
        assert_eq!(config.model.endpoint, "http://10.0.2.2:8080/");
        assert_eq!(config.model.n_predict, 256);
        assert_eq!(config.prompt.max_nodes, 12);
        assert_eq!(config.perceiver.max_elements, 40);
        assert_eq!(config.guardrails.app_targets.len(), 1);
        assert!(config.guardrails.app_targets[0].is_foreground(Some("com.google.android.apps.maps")));
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = AppConfig::from_yaml("{}").expect("parse");
        assert_eq!(config.runner.step_delay_ms, 450);
        assert_eq!(config.executor.scroll_step_delay_ms, 160);
    }
}
