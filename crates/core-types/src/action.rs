use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Selector;

fn default_scroll_amount() -> i64 {
    1
}

/// One step the model may ask the executor to perform.
///
/// Numeric fields are signed so out-of-range values survive decoding and
/// can be reported by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum Action {
    OpenApp {
        #[serde(rename = "app")]
        name: String,
    },
    Click {
        selector: Selector,
    },
    TypeText {
        text: String,
    },
    Scroll {
        direction: ScrollDirection,
        #[serde(default = "default_scroll_amount")]
        amount: i64,
    },
    Back {},
    Home {},
    Wait {
        ms: i64,
    },
}

impl Action {
    pub fn open_app(name: impl Into<String>) -> Self {
        Self::OpenApp { name: name.into() }
    }

    pub fn click(selector: Selector) -> Self {
        Self::Click { selector }
    }

    pub fn type_text(text: impl Into<String>) -> Self {
        Self::TypeText { text: text.into() }
    }

    pub fn scroll(direction: ScrollDirection, amount: i64) -> Self {
        Self::Scroll { direction, amount }
    }

    pub fn wait(ms: i64) -> Self {
        Self::Wait { ms }
    }

    /// Wire name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::OpenApp { .. } => "open_app",
            Action::Click { .. } => "click",
            Action::TypeText { .. } => "type_text",
            Action::Scroll { .. } => "scroll",
            Action::Back {} => "back",
            Action::Home {} => "home",
            Action::Wait { .. } => "wait",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Up reveals earlier content, down reveals later content.
    pub fn step(self) -> ScrollStep {
        match self {
            ScrollDirection::Up => ScrollStep::Backward,
            ScrollDirection::Down => ScrollStep::Forward,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform scroll primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollStep {
    Forward,
    Backward,
}

/// Global navigation primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationKind {
    Back,
    Home,
}

impl fmt::Display for NavigationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationKind::Back => f.write_str("back"),
            NavigationKind::Home => f.write_str("home"),
        }
    }
}
