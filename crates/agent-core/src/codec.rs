//! JSON extraction and strict decoding of model output.

use crate::errors::AgentError;
use crate::protocol::AgentResponse;

/// Outcome of decoding raw model text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    Success(AgentResponse),
    Failure {
        reason: String,
        /// The extracted object text, when extraction got that far.
        raw_json: Option<String>,
    },
}

impl DecodeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DecodeResult::Success(_))
    }
}

/// Returns the first balanced top-level `{...}` in `raw`.
///
/// Quoted strings are tracked (with backslash escapes) so braces inside
/// string literals do not move the depth counter.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaping = false;

    for (index, ch) in raw.char_indices() {
        if in_string {
            if escaping {
                escaping = false;
            } else if ch == '\\' {
                escaping = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(index);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = start {
                        return Some(&raw[start..=index]);
                    }
                }
            }
            _ => {}
        }
    }

    None
}

/// Extracts and strictly decodes an [`AgentResponse`].
pub fn decode(raw: &str) -> DecodeResult {
    let Some(payload) = extract_json_object(raw) else {
        return DecodeResult::Failure {
            reason: "No JSON object found in model output.".to_string(),
            raw_json: None,
        };
    };

    match serde_json::from_str::<AgentResponse>(payload) {
        Ok(response) => DecodeResult::Success(response),
        Err(err) => DecodeResult::Failure {
            reason: format!("Invalid agent response JSON: {err}"),
            raw_json: Some(payload.to_string()),
        },
    }
}

/// Minified wire form of a response.
pub fn encode(response: &AgentResponse) -> Result<String, AgentError> {
    Ok(serde_json::to_string(response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::AgentStatus;
    use screenpilot_core_types::Action;

    #[test]
    fn test_extracts_object_from_prose_and_fences() {
        let raw = "Sure! Here you go:\n```json\n{\"status\":\"done\",\"result\":\"ok\"}\n```\nThanks";
        assert_eq!(
            extract_json_object(raw),
            Some("{\"status\":\"done\",\"result\":\"ok\"}")
        );
    }

    #[test]
    fn test_braces_inside_strings_do_not_count() {
        let raw = r#"x {"status":"done","result":"a } b \" { c"} trailing }"#;
        assert_eq!(
            extract_json_object(raw),
            Some(r#"{"status":"done","result":"a } b \" { c"}"#)
        );
    }

    #[test]
    fn test_first_object_wins() {
        let raw = r#"{"a":{"b":1}} {"c":2}"#;
        assert_eq!(extract_json_object(raw), Some(r#"{"a":{"b":1}}"#));
    }

    #[test]
    fn test_missing_object_reports_no_payload() {
        let result = decode("I think we should click the button.");
        assert_eq!(
            result,
            DecodeResult::Failure {
                reason: "No JSON object found in model output.".to_string(),
                raw_json: None,
            }
        );
        assert!(!decode("{ unterminated").is_success());
    }

    #[test]
    fn test_schema_violation_keeps_extracted_text() {
        let result = decode(r#"noise {"status":"finished"} noise"#);
        match result {
            DecodeResult::Failure { reason, raw_json } => {
                assert!(reason.starts_with("Invalid agent response JSON: "));
                assert_eq!(raw_json.as_deref(), Some(r#"{"status":"finished"}"#));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_navigation_action_with_extra_key_is_rejected() {
        for raw in [
            r#"{"status":"in_progress","actions":[{"type":"back","foo":1}]}"#,
            r#"{"status":"in_progress","actions":[{"type":"home","foo":1}]}"#,
        ] {
            match decode(raw) {
                DecodeResult::Failure { reason, raw_json } => {
                    assert!(reason.starts_with("Invalid agent response JSON: "));
                    assert_eq!(raw_json.as_deref(), Some(raw));
                }
                other => panic!("expected failure, got {other:?}"),
            }
        }
        assert!(decode(r#"{"status":"in_progress","actions":[{"type":"back"}]}"#).is_success());
    }

    #[test]
    fn test_decodes_actions() {
        let raw = r#"{"status":"in_progress","actions":[{"type":"click","selector":{"textContains":"Messages"}},{"type":"wait","ms":600}],"needsUserConfirmation":false}"#;
        match decode(raw) {
            DecodeResult::Success(response) => {
                assert_eq!(response.status, AgentStatus::InProgress);
                assert_eq!(response.actions.len(), 2);
                assert_eq!(response.actions[1], Action::wait(600));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_is_decodable() {
        let encoded = encode(&crate::AgentResponse::done("ok")).unwrap();
        assert!(decode(&encoded).is_success());
    }
}
