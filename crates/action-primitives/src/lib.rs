//! Action primitives - executes agent actions against a UI automation backend
//!
//! This crate provides:
//! - The `AutomationBackend` port the platform implements
//! - One primitive per action: open_app, click, type_text, scroll, back/home, wait
//! - App-name resolution (identifier, well-known table, launcher scan)
//! - `ExecutionResult` reports; failures are values, never panics or errors

mod apps;
pub mod backend;
pub mod errors;
mod primitives;
pub mod types;

pub use apps::*;
pub use backend::*;
pub use errors::*;
pub use primitives::*;
pub use types::*;
