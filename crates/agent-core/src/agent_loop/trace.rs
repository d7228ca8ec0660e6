//! Human-readable step feedback and the bounded action trace.

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

use action_primitives::ExecutionResult;
use screenpilot_core_types::Action;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapses whitespace and cuts to `max_chars`, appending `...` when cut.
pub fn trim_for_trace(value: &str, max_chars: usize) -> String {
    let clean = WHITESPACE.replace_all(value, " ");
    let clean = clean.trim();
    if clean.chars().count() <= max_chars {
        clean.to_string()
    } else {
        let mut cut: String = clean.chars().take(max_chars).collect();
        cut.push_str("...");
        cut
    }
}

/// Compact call-like rendering of an action, e.g. `click(Messages)`.
pub fn action_trace(action: &Action) -> String {
    match action {
        Action::OpenApp { name } => format!("open_app({})", trim_for_trace(name, 28)),
        Action::Click { selector } => {
            format!("click({})", trim_for_trace(selector.first_signal().unwrap_or("?"), 36))
        }
        Action::TypeText { text } => format!("type_text({})", trim_for_trace(text, 28)),
        Action::Scroll { direction, amount } => format!("scroll({direction},{amount})"),
        Action::Back {} => "back()".to_string(),
        Action::Home {} => "home()".to_string(),
        Action::Wait { ms } => format!("wait({ms})"),
    }
}

/// `step N: success=.., msg=.. | ...`
pub fn feedback_line(step: u32, results: &[ExecutionResult]) -> String {
    let summary = results
        .iter()
        .map(|result| format!("success={}, msg={}", result.success, result.message))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("step {step}: {summary}")
}

/// `step N: <action> => ok|fail`
pub fn trace_entry(step: u32, result: &ExecutionResult) -> String {
    let verdict = if result.success { "ok" } else { "fail" };
    format!("step {step}: {} => {verdict}", action_trace(&result.action))
}

/// Oldest-evicting ring of trace entries.
#[derive(Debug, Clone)]
pub struct TraceRing {
    entries: VecDeque<String>,
    capacity: usize,
}

impl TraceRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push_back(entry.into());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Entries oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
