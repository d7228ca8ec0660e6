//! Structural perception of a live UI tree.
//!
//! Owns the one pre-order traversal that both the snapshot compactor and the
//! element matcher use, so snapshot ids and re-resolved ids always agree.

pub mod api;
pub mod config;
pub mod memory;
pub mod ports;
pub mod structural;
pub mod traversal;

pub use api::StructuralPerceiver;
pub use config::PerceiverConfig;
pub use memory::{MemoryNode, MemoryTree, NodeSpec};
pub use ports::{ScreenSource, UiNode};
pub use structural::{normalize_text, StructuralPerceiverImpl};
pub use traversal::{find_first, is_of_interest, walk_tree, Visit};
