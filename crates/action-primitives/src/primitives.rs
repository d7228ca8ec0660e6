//! Action primitives implementation
//!
//! One primitive per action variant:
//! 1. open_app - resolve and launch an app
//! 2. click - resolve a selector and click the actionable node
//! 3. type_text - set text on the focused or first editable node
//! 4. scroll - repeat a scroll step on the first scrollable node
//! 5. navigate - global back/home
//! 6. wait - sleep for a fixed duration

mod click;
mod navigate;
mod open_app;
mod scroll;
mod type_text;
mod wait;

pub use click::*;
pub use navigate::*;
pub use open_app::*;
pub use scroll::*;
pub use type_text::*;
pub use wait::*;

use std::sync::Arc;

use action_locator::ElementMatcher;
use async_trait::async_trait;
use tracing::{info, warn};

use screenpilot_core_types::{Action, NavigationKind};

use crate::backend::AutomationBackend;
use crate::types::{ExecutionResult, ExecutorConfig};

/// Action executor trait
///
/// Executing never fails as a Rust error: every outcome, including backend
/// failures, comes back as an [`ExecutionResult`].
#[async_trait]
pub trait ActionPrimitives: Send + Sync {
    /// Execute one action
    async fn execute(&self, action: &Action) -> ExecutionResult;

    /// Execute actions in order; a failure does not stop later actions
    async fn execute_all(&self, actions: &[Action]) -> Vec<ExecutionResult> {
        let mut results = Vec::with_capacity(actions.len());
        for action in actions {
            results.push(self.execute(action).await);
        }
        results
    }
}

/// Default executor over an [`AutomationBackend`]
pub struct DefaultActionPrimitives<B>
where
    B: AutomationBackend,
{
    backend: Arc<B>,
    matcher: ElementMatcher,
    config: ExecutorConfig,
}

impl<B> DefaultActionPrimitives<B>
where
    B: AutomationBackend,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_config(backend, ExecutorConfig::default())
    }

    pub fn with_config(backend: Arc<B>, config: ExecutorConfig) -> Self {
        Self {
            backend,
            matcher: ElementMatcher::default(),
            config,
        }
    }

    pub fn with_matcher(mut self, matcher: ElementMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn matcher(&self) -> &ElementMatcher {
        &self.matcher
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }
}

#[async_trait]
impl<B> ActionPrimitives for DefaultActionPrimitives<B>
where
    B: AutomationBackend + 'static,
{
    async fn execute(&self, action: &Action) -> ExecutionResult {
        info!(action = action.kind(), "Executing action");

        let result = match action {
            Action::OpenApp { name } => execute_open_app(self, action, name),
            Action::Click { selector } => execute_click(self, action, selector),
            Action::TypeText { text } => execute_type_text(self, action, text),
            Action::Scroll { direction, amount } => {
                execute_scroll(self, action, *direction, *amount).await
            }
            Action::Back {} => execute_navigation(self, action, NavigationKind::Back),
            Action::Home {} => execute_navigation(self, action, NavigationKind::Home),
            Action::Wait { ms } => execute_wait(action, *ms).await,
        };

        if result.success {
            info!(action = action.kind(), message = %result.message, "Action succeeded");
        } else {
            warn!(action = action.kind(), message = %result.message, "Action failed");
        }
        result
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use parking_lot::Mutex;

    use perceiver_structural::{MemoryNode, MemoryTree, NodeSpec, ScreenSource};
    use screenpilot_core_types::{NavigationKind, ScrollStep};

    use crate::backend::AutomationBackend;
    use crate::errors::BackendError;
    use crate::types::LaunchableApp;

    /// Backend over a fixed in-memory tree that records every call.
    pub struct FakeBackend {
        pub tree: Option<MemoryTree>,
        pub apps: Vec<LaunchableApp>,
        pub launch_error: Option<String>,
        pub scroll_budget: Option<usize>,
        pub navigation_ok: bool,
        pub set_text_ok: bool,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        pub fn new(spec: NodeSpec) -> Self {
            Self {
                tree: Some(MemoryTree::from_spec(&spec)),
                apps: Vec::new(),
                launch_error: None,
                scroll_budget: None,
                navigation_ok: true,
                set_text_ok: true,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn without_root() -> Self {
            Self {
                tree: None,
                ..Self::new(NodeSpec::node())
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().push(call);
        }
    }

    fn name_of(node: &MemoryNode) -> String {
        crate::backend::describe(node)
    }

    impl ScreenSource for FakeBackend {
        type Node = MemoryNode;

        fn active_root(&self) -> Option<MemoryNode> {
            self.tree.as_ref().map(MemoryTree::root)
        }

        fn foreground_app(&self) -> Option<String> {
            Some("com.example.launcher".to_string())
        }
    }

    impl AutomationBackend for FakeBackend {
        fn click(&self, node: &MemoryNode) -> bool {
            self.record(format!("click:{}", name_of(node)));
            true
        }

        fn set_text(&self, node: &MemoryNode, text: &str) -> bool {
            self.record(format!("set_text:{}:{text}", name_of(node)));
            if self.set_text_ok {
                node.set_text(text);
            }
            self.set_text_ok
        }

        fn focus(&self, node: &MemoryNode) -> bool {
            self.record(format!("focus:{}", name_of(node)));
            node.update(|attrs| attrs.focused = true);
            true
        }

        fn scroll_step(&self, node: &MemoryNode, step: ScrollStep) -> bool {
            let done = self
                .calls()
                .iter()
                .filter(|call| call.starts_with("scroll:"))
                .count();
            self.record(format!("scroll:{}:{step:?}", name_of(node)));
            self.scroll_budget.map(|budget| done < budget).unwrap_or(true)
        }

        fn global_navigation(&self, kind: NavigationKind) -> bool {
            self.record(format!("nav:{kind}"));
            self.navigation_ok
        }

        fn launch(&self, app_identifier: &str) -> Result<(), BackendError> {
            self.record(format!("launch:{app_identifier}"));
            match &self.launch_error {
                Some(message) => Err(BackendError::launch_failed(message.clone())),
                None => Ok(()),
            }
        }

        fn resolve_launchable(&self, identifier: &str) -> Option<String> {
            self.apps
                .iter()
                .find(|app| app.identifier == identifier)
                .map(|app| app.identifier.clone())
        }

        fn launchable_apps(&self) -> Vec<LaunchableApp> {
            self.apps.clone()
        }
    }
}
