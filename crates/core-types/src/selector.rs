use serde::{Deserialize, Serialize};

/// Fuzzy, multi-signal description of one live element.
///
/// Blank fields count as unset everywhere a selector is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Selector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_desc_contains: Option<String>,
    #[serde(
        default,
        alias = "viewIdContains",
        skip_serializing_if = "Option::is_none"
    )]
    pub identifier_contains: Option<String>,
}

impl Selector {
    pub fn node_id(id: impl Into<String>) -> Self {
        Self {
            node_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text_contains: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_content_desc(mut self, value: impl Into<String>) -> Self {
        self.content_desc_contains = Some(value.into());
        self
    }

    pub fn with_identifier(mut self, value: impl Into<String>) -> Self {
        self.identifier_contains = Some(value.into());
        self
    }

    pub fn node_id_signal(&self) -> Option<&str> {
        signal(&self.node_id)
    }

    pub fn text_signal(&self) -> Option<&str> {
        signal(&self.text_contains)
    }

    pub fn content_desc_signal(&self) -> Option<&str> {
        signal(&self.content_desc_contains)
    }

    pub fn identifier_signal(&self) -> Option<&str> {
        signal(&self.identifier_contains)
    }

    /// A selector is usable only when at least one field is non-blank.
    pub fn has_any_signal(&self) -> bool {
        self.first_signal().is_some()
    }

    /// First usable signal in text, label, identifier, node id order.
    pub fn first_signal(&self) -> Option<&str> {
        self.text_signal()
            .or_else(|| self.content_desc_signal())
            .or_else(|| self.identifier_signal())
            .or_else(|| self.node_id_signal())
    }
}

fn signal(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_are_not_signals() {
        let selector = Selector {
            text_contains: Some("   ".into()),
            ..Selector::default()
        };
        assert!(!selector.has_any_signal());
        assert!(Selector::node_id("n4").has_any_signal());
    }

    #[test]
    fn test_first_signal_prefers_text() {
        let selector = Selector::node_id("n2").with_identifier("send_btn");
        assert_eq!(selector.first_signal(), Some("send_btn"));
        let selector = selector.with_content_desc(" Send ");
        assert_eq!(selector.first_signal(), Some("Send"));
    }

    #[test]
    fn test_view_id_alias_is_accepted() {
        let selector: Selector =
            serde_json::from_str(r#"{"viewIdContains":"compose"}"#).unwrap();
        assert_eq!(selector.identifier_signal(), Some("compose"));
        assert!(serde_json::from_str::<Selector>(r#"{"css":"a"}"#).is_err());
    }
}
