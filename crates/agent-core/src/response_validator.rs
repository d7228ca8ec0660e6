//! Protocol rules decoding alone cannot express.

use screenpilot_core_types::Action;

use crate::protocol::{AgentResponse, AgentStatus, ValidationIssue};

pub const MAX_ACTIONS_PER_STEP: usize = 3;
pub const MAX_TYPED_TEXT_LENGTH: usize = 500;
pub const MAX_WAIT_MS: i64 = 3000;
pub const MAX_APP_NAME_LENGTH: usize = 80;

/// Returns every issue with `response`; empty means valid.
///
/// All rules run, so one response can report several problems.
pub fn validate(response: &AgentResponse) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match response.status {
        AgentStatus::InProgress if response.actions.is_empty() => {
            issues.push(ValidationIssue::new(
                "actions",
                "Must include at least one action when status is in_progress.",
            ));
        }
        AgentStatus::NeedsClarification if is_blank(response.question.as_deref()) => {
            issues.push(ValidationIssue::new(
                "question",
                "Must include a non-empty question when status is needs_clarification.",
            ));
        }
        AgentStatus::Done if is_blank(response.result.as_deref()) => {
            issues.push(ValidationIssue::new(
                "result",
                "Must include a non-empty result when status is done.",
            ));
        }
        _ => {}
    }

    if response.actions.len() > MAX_ACTIONS_PER_STEP {
        issues.push(ValidationIssue::new(
            "actions",
            format!("Too many actions. Max allowed per step is {MAX_ACTIONS_PER_STEP}."),
        ));
    }

    if response.needs_user_confirmation && is_blank(response.confirmation_prompt.as_deref()) {
        issues.push(ValidationIssue::new(
            "confirmationPrompt",
            "Must include confirmationPrompt when needsUserConfirmation is true.",
        ));
    }

    for (index, action) in response.actions.iter().enumerate() {
        validate_action(index, action, &mut issues);
    }

    issues
}

fn validate_action(index: usize, action: &Action, issues: &mut Vec<ValidationIssue>) {
    let field = |name: &str| format!("actions[{index}].{name}");

    match action {
        Action::OpenApp { name } => {
            if name.trim().is_empty() {
                issues.push(ValidationIssue::new(field("app"), "App name/package cannot be blank."));
            }
            if name.chars().count() > MAX_APP_NAME_LENGTH {
                issues.push(ValidationIssue::new(field("app"), "App name/package is too long."));
            }
        }
        Action::Click { selector } => {
            if !selector.has_any_signal() {
                issues.push(ValidationIssue::new(
                    field("selector"),
                    "Selector must include at least one matcher (text/contentDesc/identifier/nodeId).",
                ));
            }
        }
        Action::TypeText { text } => {
            if text.trim().is_empty() {
                issues.push(ValidationIssue::new(field("text"), "Text cannot be blank."));
            }
            if text.chars().count() > MAX_TYPED_TEXT_LENGTH {
                issues.push(ValidationIssue::new(
                    field("text"),
                    format!("Text exceeds max length ({MAX_TYPED_TEXT_LENGTH})."),
                ));
            }
        }
        Action::Scroll { amount, .. } => {
            if !(1..=3).contains(amount) {
                issues.push(ValidationIssue::new(
                    field("amount"),
                    "Scroll amount must be in range 1..3.",
                ));
            }
        }
        Action::Back {} | Action::Home {} => {}
        Action::Wait { ms } => {
            if !(0..=MAX_WAIT_MS).contains(ms) {
                issues.push(ValidationIssue::new(
                    field("ms"),
                    format!("Wait ms must be in range 0..{MAX_WAIT_MS}."),
                ));
            }
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenpilot_core_types::{ScrollDirection, Selector};

    fn fields(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().map(|issue| issue.field.as_str()).collect()
    }

    #[test]
    fn test_valid_responses_have_no_issues() {
        assert!(validate(&AgentResponse::in_progress(vec![Action::wait(0)])).is_empty());
        assert!(validate(&AgentResponse::done("Opened inbox")).is_empty());
        assert!(validate(&AgentResponse::clarification("Which chat?")).is_empty());
        assert!(validate(&AgentResponse::error("stuck")).is_empty());
        assert!(validate(&AgentResponse {
            result: None,
            ..AgentResponse::error("")
        })
        .is_empty());
    }

    #[test]
    fn test_status_field_requirements() {
        let issues = validate(&AgentResponse::in_progress(vec![]));
        assert_eq!(fields(&issues), vec!["actions"]);
        assert_eq!(
            issues[0].message,
            "Must include at least one action when status is in_progress."
        );

        assert_eq!(fields(&validate(&AgentResponse::clarification("  "))), vec!["question"]);
        assert_eq!(fields(&validate(&AgentResponse::done(""))), vec!["result"]);
    }

    #[test]
    fn test_too_many_actions() {
        let issues = validate(&AgentResponse::in_progress(vec![Action::Back {}; 4]));
        assert_eq!(fields(&issues), vec!["actions"]);
        assert_eq!(issues[0].message, "Too many actions. Max allowed per step is 3.");
    }

    #[test]
    fn test_confirmation_prompt_required() {
        let mut response = AgentResponse::in_progress(vec![Action::Home {}]);
        response.needs_user_confirmation = true;
        assert_eq!(fields(&validate(&response)), vec!["confirmationPrompt"]);
    }

    #[test]
    fn test_per_action_rules() {
        let cases = vec![
            (Action::open_app(" "), "actions[0].app"),
            (Action::open_app("x".repeat(81)), "actions[0].app"),
            (Action::click(Selector::default()), "actions[0].selector"),
            (Action::type_text(""), "actions[0].text"),
            (Action::type_text("y".repeat(501)), "actions[0].text"),
            (Action::scroll(ScrollDirection::Down, 0), "actions[0].amount"),
            (Action::scroll(ScrollDirection::Up, 4), "actions[0].amount"),
            (Action::wait(-1), "actions[0].ms"),
            (Action::wait(3001), "actions[0].ms"),
        ];
        for (action, field) in cases {
            let issues = validate(&AgentResponse::in_progress(vec![action.clone()]));
            assert_eq!(fields(&issues), vec![field], "action {action:?}");
        }
    }

    #[test]
    fn test_issues_accumulate() {
        let mut response = AgentResponse::in_progress(vec![
            Action::wait(5000),
            Action::Back {},
            Action::type_text(" "),
            Action::Home {},
        ]);
        response.needs_user_confirmation = true;
        let issues = validate(&response);
        assert_eq!(
            fields(&issues),
            vec!["actions", "confirmationPrompt", "actions[0].ms", "actions[2].text"]
        );
    }
}
