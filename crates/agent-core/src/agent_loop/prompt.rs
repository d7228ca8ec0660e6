//! Prompt construction for each planning step.
//!
//! The prompt carries the goal, a compact view of the current screen, the
//! latest execution feedback and action trace, and a retry rule whenever
//! the previous step produced an error.

use serde::Serialize;

use screenpilot_core_types::{Element, Snapshot};

use super::config::{PromptConfig, PromptFormat};

/// System section sent with every step.
pub const AGENT_SYSTEM_PROMPT: &str = r#"You are an offline UI agent that operates a phone screen one step at a time.
Reply with exactly one minified JSON object and nothing else: no markdown, no prose, no code fences, no extra keys.

Contract:
{"status":"in_progress","actions":[{"type":"open_app","app":"Instagram"}],"question":null,"result":null,"needsUserConfirmation":false,"confirmationPrompt":null}

status is one of: in_progress, needs_clarification, done, error
action type is one of: open_app{app}, click{selector}, type_text{text}, scroll{direction:up|down, amount:1..3}, back, home, wait{ms:0..3000}
selector keys: nodeId, textContains, contentDescContains, identifierContains

Rules:
- With status "in_progress", return exactly 1 action.
- Use open_app when the goal names an app and foregroundApp is a different app.
- Build selectors only from the current nodes; prefer text, contentDesc or identifier over nodeId.
- When unsure what the user wants, use status "needs_clarification" with a question.
- Use status "done" only when the current context shows the goal is reached.
- The reply starts with '{' and ends with '}'.

Examples:
- Goal mentions Instagram, foregroundApp is not Instagram:
  {"status":"in_progress","actions":[{"type":"open_app","app":"Instagram"}],"needsUserConfirmation":false}
- foregroundApp is Instagram and a node has text "Messages":
  {"status":"in_progress","actions":[{"type":"click","selector":{"textContains":"Messages"}}],"needsUserConfirmation":false}"#;

/// Instruction added whenever the previous step failed.
pub const RETRY_RULE: &str = "Previous output was invalid. Retry from CURRENT context and return one valid JSON object with exactly one action.";

/// Everything a single prompt is built from.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub goal: &'a str,
    pub step: u32,
    pub snapshot: Option<&'a Snapshot>,
    /// Feedback lines, oldest first.
    pub feedback: &'a [String],
    /// Trace entries, oldest first.
    pub recent_actions: &'a [String],
    pub last_error: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompactContext<'a> {
    foreground_app: Option<&'a str>,
    nodes: Vec<CompactNode<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompactNode<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_desc: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<&'a str>,
    clickable: bool,
    editable: bool,
}

impl<'a> From<&'a Element> for CompactNode<'a> {
    fn from(element: &'a Element) -> Self {
        Self {
            id: &element.id,
            text: element.text.as_deref(),
            content_desc: element.accessible_label.as_deref(),
            identifier: element.identifier.as_deref(),
            clickable: element.clickable,
            editable: element.editable,
        }
    }
}

/// Builds step prompts.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    config: PromptConfig,
}

impl PromptBuilder {
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PromptConfig {
        &self.config
    }

    /// Compact JSON of the snapshot: capped node count, no bounds or flags
    /// beyond clickable/editable.
    pub fn compact_context(&self, snapshot: Option<&Snapshot>) -> String {
        let context = CompactContext {
            foreground_app: snapshot.and_then(|s| s.foreground_app.as_deref()),
            nodes: snapshot
                .map(|s| {
                    s.elements
                        .iter()
                        .take(self.config.max_nodes)
                        .map(CompactNode::from)
                        .collect()
                })
                .unwrap_or_default(),
        };
        serde_json::to_string(&context).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn build(&self, input: &PromptInput<'_>) -> String {
        let user = self.user_section(input);
        match self.config.format {
            PromptFormat::ChatTurns => format!(
                "<start_of_turn>system\n{AGENT_SYSTEM_PROMPT}\n<end_of_turn>\n<start_of_turn>user\n{user}\n<end_of_turn>\n<start_of_turn>model\n"
            ),
            PromptFormat::Plain => format!("{AGENT_SYSTEM_PROMPT}\n\n{user}\n"),
        }
    }

    fn user_section(&self, input: &PromptInput<'_>) -> String {
        let feedback = tail(input.feedback, self.config.max_feedback_items).join("\n");
        let mut recent = tail(input.recent_actions, self.config.max_recent_actions).to_vec();
        recent.reverse();
        let recent = recent.join("\n");

        format!(
            "Goal: {goal}\nStep: {step}\n\nCurrent compact screen context (JSON):\n{context}\n\n\
             Recent execution feedback:\n{feedback}\n\n\
             Recent action trace (latest first):\n{recent}\n\n\
             Last planner/execution error:\n{error}\n\n\
             Retry rule:\n{retry}",
            goal = input.goal.trim(),
            step = input.step,
            context = self.compact_context(input.snapshot),
            feedback = or_none(&feedback),
            recent = or_none(&recent),
            error = input.last_error.unwrap_or("none"),
            retry = if input.last_error.is_some() { RETRY_RULE } else { "none" },
        )
    }
}

fn tail(items: &[String], count: usize) -> &[String] {
    &items[items.len().saturating_sub(count)..]
}

fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        "none"
    } else {
        text
    }
}
