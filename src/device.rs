//! Simulated device driven by a YAML screen fixture
//!
//! A fixture names a set of screens, each owned by one app and described as
//! a node tree. Clicking a node with a `link` moves to that screen, launching
//! an app shows its entry screen, and back/home walk the screen history.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use action_primitives::{AutomationBackend, BackendError, LaunchableApp};
use perceiver_structural::{MemoryNode, MemoryTree, NodeSpec, ScreenSource, UiNode};
use screenpilot_core_types::{NavigationKind, ScrollStep};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenFixture {
    /// Identifier of the app owning this screen.
    pub app: String,
    pub root: NodeSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureApp {
    pub label: String,
    pub identifier: String,
    /// Screen shown when the app is launched.
    pub screen: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFixture {
    /// Screen shown at startup.
    pub start: String,
    /// Screen for the global home action; defaults to `start`.
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub apps: Vec<FixtureApp>,
    pub screens: BTreeMap<String, ScreenFixture>,
}

impl DeviceFixture {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let fixture: DeviceFixture =
            serde_yaml::from_str(content).context("Failed to parse screen fixture")?;
        fixture.check_references()?;
        Ok(fixture)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read screen fixture {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid screen fixture {}", path.display()))
    }

    pub fn home_screen(&self) -> &str {
        self.home.as_deref().unwrap_or(&self.start)
    }

    fn check_references(&self) -> Result<()> {
        self.require_screen(&self.start, "start")?;
        self.require_screen(self.home_screen(), "home")?;
        for app in &self.apps {
            self.require_screen(&app.screen, &format!("app '{}'", app.label))?;
        }
        for (name, screen) in &self.screens {
            let mut pending = vec![&screen.root];
            while let Some(spec) = pending.pop() {
                if let Some(link) = &spec.link {
                    self.require_screen(link, &format!("link on screen '{name}'"))?;
                }
                pending.extend(spec.children.iter());
            }
        }
        Ok(())
    }

    fn require_screen(&self, screen: &str, referenced_by: &str) -> Result<()> {
        if !self.screens.contains_key(screen) {
            bail!("{referenced_by} refers to unknown screen '{screen}'");
        }
        Ok(())
    }
}

struct DeviceState {
    screen: String,
    tree: MemoryTree,
    history: Vec<String>,
}

/// In-memory phone implementing both the inspection and automation ports.
pub struct SimulatedDevice {
    fixture: DeviceFixture,
    state: RwLock<DeviceState>,
}

impl SimulatedDevice {
    pub fn new(fixture: DeviceFixture) -> Result<Self> {
        fixture.check_references()?;
        let screen = fixture.start.clone();
        let tree = MemoryTree::from_spec(&fixture.screens[&screen].root);
        Ok(Self {
            fixture,
            state: RwLock::new(DeviceState {
                screen,
                tree,
                history: Vec::new(),
            }),
        })
    }

    pub fn fixture(&self) -> &DeviceFixture {
        &self.fixture
    }

    pub fn current_screen(&self) -> String {
        self.state.read().screen.clone()
    }

    /// Replaces the visible tree with a fresh copy of `screen`.
    fn show(&self, screen: &str, remember_current: bool) -> bool {
        let Some(fixture) = self.fixture.screens.get(screen) else {
            return false;
        };
        let mut state = self.state.write();
        if remember_current {
            let previous = std::mem::replace(&mut state.screen, screen.to_string());
            state.history.push(previous);
        } else {
            state.screen = screen.to_string();
        }
        state.tree = MemoryTree::from_spec(&fixture.root);
        debug!(screen, app = %fixture.app, "Simulated screen change");
        true
    }
}

impl ScreenSource for SimulatedDevice {
    type Node = MemoryNode;

    fn active_root(&self) -> Option<MemoryNode> {
        Some(self.state.read().tree.root())
    }

    fn foreground_app(&self) -> Option<String> {
        let state = self.state.read();
        self.fixture
            .screens
            .get(&state.screen)
            .map(|screen| screen.app.clone())
    }
}

impl AutomationBackend for SimulatedDevice {
    fn click(&self, node: &MemoryNode) -> bool {
        if !node.attributes().enabled {
            return false;
        }
        match node.link() {
            Some(link) => self.show(&link, true),
            None => true,
        }
    }

    fn set_text(&self, node: &MemoryNode, text: &str) -> bool {
        if !node.attributes().is_editable_target() {
            return false;
        }
        node.set_text(text);
        true
    }

    fn focus(&self, node: &MemoryNode) -> bool {
        let attributes = node.attributes();
        if !(attributes.focusable || attributes.editable) {
            return false;
        }
        self.state.read().tree.clear_focus();
        node.update(|attributes| attributes.focused = true);
        true
    }

    fn scroll_step(&self, node: &MemoryNode, step: ScrollStep) -> bool {
        node.attributes().supports_scroll(step)
    }

    fn global_navigation(&self, kind: NavigationKind) -> bool {
        match kind {
            NavigationKind::Back => {
                let previous = self.state.write().history.pop();
                match previous {
                    Some(screen) => self.show(&screen, false),
                    None => false,
                }
            }
            NavigationKind::Home => {
                self.state.write().history.clear();
                let home = self.fixture.home_screen().to_string();
                self.show(&home, false)
            }
        }
    }

    fn launch(&self, app_identifier: &str) -> Result<(), BackendError> {
        let app = self
            .fixture
            .apps
            .iter()
            .find(|app| app.identifier == app_identifier)
            .ok_or_else(|| BackendError::launch_failed(format!("no launch intent for {app_identifier}")))?;
        info!(app = %app.identifier, screen = %app.screen, "Simulated app launch");
        if self.show(&app.screen, true) {
            Ok(())
        } else {
            Err(BackendError::Unavailable(format!("screen '{}' missing", app.screen)))
        }
    }

    fn resolve_launchable(&self, identifier: &str) -> Option<String> {
        self.fixture
            .apps
            .iter()
            .find(|app| app.identifier == identifier)
            .map(|app| app.identifier.clone())
    }

    fn launchable_apps(&self) -> Vec<LaunchableApp> {
        self.fixture
            .apps
            .iter()
            .map(|app| LaunchableApp::new(app.label.clone(), app.identifier.clone()))
            .collect()
    }
}
