//! Element matching - resolves a fuzzy selector to one actionable node
//!
//! This crate implements selector resolution against a freshly walked tree:
//! - Per-signal scoring (node id, text, label, identifier)
//! - Actionability resolution through a bounded ancestor walk
//! - Candidate ranking that prefers direct matches on ties
//!
//! Node ids are regenerated with the same traversal the snapshot compactor
//! uses, so an id the model saw resolves to the same node here.

pub mod resolver;
pub mod strategies;
pub mod types;

pub use resolver::*;
pub use strategies::*;
pub use types::*;
