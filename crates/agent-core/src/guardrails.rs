//! Goal heuristics: bootstrap app inference and the unearned-done guard.

use serde::{Deserialize, Serialize};

use screenpilot_core_types::Snapshot;

/// An app the goal can name by keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppTarget {
    /// Lowercase keyword searched for in the goal.
    pub keyword: String,
    /// Name passed to `open_app`.
    pub display_name: String,
    /// Lowercase fragment expected in the foreground app identifier.
    /// Empty means the keyword itself.
    #[serde(default)]
    pub foreground_hint: String,
}

impl AppTarget {
    pub fn new(keyword: &str, display_name: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            display_name: display_name.to_string(),
            foreground_hint: keyword.to_string(),
        }
    }

    /// Whether `foreground_app` already belongs to this target.
    pub fn is_foreground(&self, foreground_app: Option<&str>) -> bool {
        let hint = if self.foreground_hint.is_empty() {
            &self.keyword
        } else {
            &self.foreground_hint
        };
        foreground_app
            .map(|app| app.to_lowercase().contains(hint.as_str()))
            .unwrap_or(false)
    }
}

const NAVIGATION_KEYWORDS: &[&str] = &[
    "open", "go to", "navigate", "message", "dm", "chat", "send", "click", "tap", "type",
    "scroll", "back", "home",
];

const MESSAGING_INTENT_KEYWORDS: &[&str] = &["message", "dm", "chat"];

const MESSAGING_EVIDENCE_KEYWORDS: &[&str] = &["message", "messages", "dm", "chat", "inbox"];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_string()).collect()
}

/// Keyword tables behind the guardrails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    /// Apps recognised in goal text, checked in order.
    pub app_targets: Vec<AppTarget>,
    /// Goal words that signal the user expects UI navigation.
    pub navigation_keywords: Vec<String>,
    /// Goal words that signal a messaging task.
    pub messaging_intent_keywords: Vec<String>,
    /// Screen words accepted as evidence of a messaging surface.
    pub messaging_evidence_keywords: Vec<String>,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            app_targets: vec![
                AppTarget::new("instagram", "Instagram"),
                AppTarget::new("whatsapp", "WhatsApp"),
                AppTarget::new("telegram", "Telegram"),
                AppTarget::new("gmail", "Gmail"),
                AppTarget::new("youtube", "YouTube"),
            ],
            navigation_keywords: owned(NAVIGATION_KEYWORDS),
            messaging_intent_keywords: owned(MESSAGING_INTENT_KEYWORDS),
            messaging_evidence_keywords: owned(MESSAGING_EVIDENCE_KEYWORDS),
        }
    }
}

impl GuardrailConfig {
    pub fn with_app_target(mut self, target: AppTarget) -> Self {
        self.app_targets.push(target);
        self
    }
}

/// Applies [`GuardrailConfig`] to goals and snapshots.
#[derive(Debug, Clone, Default)]
pub struct Guardrails {
    config: GuardrailConfig,
}

impl Guardrails {
    pub fn new(config: GuardrailConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardrailConfig {
        &self.config
    }

    /// First configured app whose keyword appears in the goal.
    pub fn infer_app_target(&self, goal: &str) -> Option<&AppTarget> {
        let goal = goal.to_lowercase();
        self.config
            .app_targets
            .iter()
            .find(|target| goal.contains(&target.keyword))
    }

    /// App to open without consulting the model, if any.
    ///
    /// Only fires on step 1 before anything has succeeded, and only when the
    /// goal's app is not already in the foreground.
    pub fn bootstrap_target(
        &self,
        goal: &str,
        step: u32,
        successful_actions: usize,
        snapshot: &Snapshot,
    ) -> Option<&AppTarget> {
        if step != 1 || successful_actions > 0 {
            return None;
        }
        self.infer_app_target(goal)
            .filter(|target| !target.is_foreground(snapshot.foreground_app.as_deref()))
    }

    /// Whether a `done` verdict lacks observable evidence.
    pub fn should_reject_done(
        &self,
        goal: &str,
        successful_actions: usize,
        snapshot: &Snapshot,
    ) -> bool {
        if successful_actions > 0 {
            return false;
        }

        let goal = goal.to_lowercase();
        if !contains_any(&goal, &self.config.navigation_keywords) {
            return false;
        }

        let foreground = snapshot.foreground_app.as_deref();
        let wrong_app = self
            .config
            .app_targets
            .iter()
            .any(|target| goal.contains(&target.keyword) && !target.is_foreground(foreground));
        if wrong_app {
            return true;
        }

        if contains_any(&goal, &self.config.messaging_intent_keywords) {
            let visible = snapshot.visible_text();
            return !contains_any(&visible, &self.config.messaging_evidence_keywords);
        }

        false
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}
