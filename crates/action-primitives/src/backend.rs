//! Platform automation port

use perceiver_structural::{find_first, ScreenSource, UiNode};
use screenpilot_core_types::{NavigationKind, ScrollStep};

use crate::errors::BackendError;
use crate::types::LaunchableApp;

/// Primitive operations the platform provides on top of inspection.
///
/// Calls are blocking from the executor's point of view.
pub trait AutomationBackend: ScreenSource {
    fn click(&self, node: &Self::Node) -> bool;

    fn set_text(&self, node: &Self::Node, text: &str) -> bool;

    fn focus(&self, node: &Self::Node) -> bool;

    fn scroll_step(&self, node: &Self::Node, step: ScrollStep) -> bool;

    fn global_navigation(&self, kind: NavigationKind) -> bool;

    fn launch(&self, app_identifier: &str) -> Result<(), BackendError>;

    /// Returns the identifier back when it names a launchable app.
    fn resolve_launchable(&self, identifier: &str) -> Option<String>;

    fn launchable_apps(&self) -> Vec<LaunchableApp>;

    /// Node currently holding input focus.
    fn input_focus(&self) -> Option<Self::Node> {
        let root = self.active_root()?;
        find_first(&root, |attributes| attributes.focused)
    }
}

/// Convenience read used by primitives when logging.
pub(crate) fn describe<N: UiNode>(node: &N) -> String {
    let attributes = node.attributes();
    attributes
        .identifier
        .or(attributes.text)
        .or(attributes.accessible_label)
        .or(attributes.class_name)
        .unwrap_or_else(|| "<anonymous>".to_string())
}
