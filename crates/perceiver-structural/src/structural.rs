use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::debug;

use screenpilot_core_types::{Element, NodeAttributes, Snapshot};

use crate::api::StructuralPerceiver;
use crate::config::PerceiverConfig;
use crate::ports::ScreenSource;
use crate::traversal::{is_of_interest, walk_tree};

/// Snapshot compactor over a [`ScreenSource`].
pub struct StructuralPerceiverImpl<S>
where
    S: ScreenSource,
{
    source: Arc<S>,
    config: PerceiverConfig,
}

impl<S> StructuralPerceiverImpl<S>
where
    S: ScreenSource,
{
    pub fn new(source: Arc<S>) -> Self {
        Self::with_config(source, PerceiverConfig::default())
    }

    pub fn with_config(source: Arc<S>, config: PerceiverConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PerceiverConfig {
        &self.config
    }

    fn to_element(&self, id: &str, attributes: &NodeAttributes) -> Element {
        let limit = self.config.max_text_length;
        Element {
            id: id.to_string(),
            text: normalize_text(attributes.text.as_deref(), limit),
            accessible_label: normalize_text(attributes.accessible_label.as_deref(), limit),
            identifier: normalize_text(attributes.identifier.as_deref(), limit),
            class_name: attributes.class_name.clone(),
            clickable: attributes.clickable,
            editable: attributes.editable,
            enabled: attributes.enabled,
            focusable: attributes.focusable,
            bounds: attributes.bounds,
        }
    }
}

impl<S> StructuralPerceiver for StructuralPerceiverImpl<S>
where
    S: ScreenSource,
{
    fn capture_snapshot(&self) -> Option<Snapshot> {
        let root = self.source.active_root()?;
        let max = self.config.max_elements;
        let mut elements = Vec::new();

        walk_tree(&root, is_of_interest, |visit| {
            if elements.len() >= max {
                return ControlFlow::Break(());
            }
            if let Some(id) = visit.snapshot_id {
                elements.push(self.to_element(id, visit.attributes));
            }
            if elements.len() >= max {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        let foreground_app = self.source.foreground_app();
        debug!(
            elements = elements.len(),
            foreground = foreground_app.as_deref().unwrap_or("-"),
            "captured snapshot"
        );
        Some(Snapshot::new(foreground_app, elements))
    }
}

/// Collapses whitespace runs, trims, and truncates to `limit` chars.
/// Blank input yields `None`.
pub fn normalize_text(value: Option<&str>, limit: usize) -> Option<String> {
    let collapsed = value?.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(limit).collect())
}
