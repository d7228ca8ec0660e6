use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Screen rectangle in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Raw attributes read off a live UI node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeAttributes {
    pub text: Option<String>,
    pub accessible_label: Option<String>,
    pub identifier: Option<String>,
    pub class_name: Option<String>,
    pub clickable: bool,
    pub editable: bool,
    pub enabled: bool,
    pub focusable: bool,
    /// Whether the node currently holds input focus.
    pub focused: bool,
    pub scrollable: bool,
    /// Scroll steps the node advertises even when not flagged scrollable.
    pub scroll_actions: Vec<super::ScrollStep>,
    pub bounds: Bounds,
}

impl Default for NodeAttributes {
    /// Nodes are enabled unless stated otherwise.
    fn default() -> Self {
        Self {
            text: None,
            accessible_label: None,
            identifier: None,
            class_name: None,
            clickable: false,
            editable: false,
            enabled: true,
            focusable: false,
            focused: false,
            scrollable: false,
            scroll_actions: Vec::new(),
            bounds: Bounds::default(),
        }
    }
}

impl NodeAttributes {
    /// Clickable and enabled: something a click primitive can act on.
    pub fn is_actionable(&self) -> bool {
        self.enabled && self.clickable
    }

    pub fn is_editable_target(&self) -> bool {
        self.enabled && self.editable
    }

    pub fn supports_scroll(&self, step: super::ScrollStep) -> bool {
        self.scrollable || self.scroll_actions.contains(&step)
    }

    pub fn has_visible_text(&self) -> bool {
        is_present(self.text.as_deref()) || is_present(self.accessible_label.as_deref())
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// One interest-worthy node of a snapshot.
///
/// `id` is only meaningful inside the snapshot that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessible_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub clickable: bool,
    pub editable: bool,
    pub enabled: bool,
    pub focusable: bool,
    pub bounds: Bounds,
}

/// A bounded, flattened, point-in-time view of the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub foreground_app: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub elements: Vec<Element>,
}

impl Snapshot {
    pub fn new(foreground_app: Option<String>, elements: Vec<Element>) -> Self {
        Self {
            foreground_app,
            timestamp: Utc::now(),
            elements,
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }

    /// Lowercased text, label and identifier of every element, space joined.
    pub fn visible_text(&self) -> String {
        self.elements
            .iter()
            .flat_map(|element| {
                [
                    element.text.as_deref(),
                    element.accessible_label.as_deref(),
                    element.identifier.as_deref(),
                ]
            })
            .flatten()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: &str, text: Option<&str>, identifier: Option<&str>) -> Element {
        Element {
            id: id.to_string(),
            text: text.map(str::to_string),
            accessible_label: None,
            identifier: identifier.map(str::to_string),
            class_name: None,
            clickable: true,
            editable: false,
            enabled: true,
            focusable: false,
            bounds: Bounds::default(),
        }
    }

    #[test]
    fn test_visible_text_joins_lowercased_fields() {
        let snapshot = Snapshot::new(
            Some("com.example".into()),
            vec![
                element("n1", Some("Inbox"), None),
                element("n2", None, Some("app:id/Chat_Tab")),
            ],
        );
        assert_eq!(snapshot.visible_text(), "inbox app:id/chat_tab");
        assert!(snapshot.element("n2").is_some());
        assert!(snapshot.element("n3").is_none());
    }

    #[test]
    fn test_attributes_scroll_support() {
        let mut attrs = NodeAttributes::default();
        assert!(!attrs.supports_scroll(crate::ScrollStep::Forward));
        attrs.scroll_actions.push(crate::ScrollStep::Backward);
        assert!(attrs.supports_scroll(crate::ScrollStep::Backward));
        assert!(!attrs.supports_scroll(crate::ScrollStep::Forward));
        attrs.scrollable = true;
        assert!(attrs.supports_scroll(crate::ScrollStep::Forward));
    }

    #[test]
    fn test_element_serializes_camel_case_without_empty_fields() {
        let value = serde_json::to_value(element("n1", Some("Send"), None)).unwrap();
        assert_eq!(value["id"], "n1");
        assert!(value.get("accessibleLabel").is_none());
        assert_eq!(value["bounds"]["right"], 0);
    }
}
