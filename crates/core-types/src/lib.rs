//! Shared primitives for the screenpilot crates.
//!
//! Everything here is a plain value: produced by one traversal or one run
//! step and dropped when that step ends.

pub mod action;
pub mod element;
pub mod selector;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use action::{Action, NavigationKind, ScrollDirection, ScrollStep};
pub use element::{Bounds, Element, NodeAttributes, Snapshot};
pub use selector::Selector;

/// Identifier of a single agent run, used to correlate log lines.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
