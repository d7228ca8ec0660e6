use serde::{Deserialize, Serialize};

/// Snapshot compaction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceiverConfig {
    /// Maximum elements kept per snapshot; traversal stops once reached.
    /// Default: 40
    pub max_elements: usize,

    /// Maximum characters kept for text, label and identifier.
    /// Default: 80
    pub max_text_length: usize,
}

impl Default for PerceiverConfig {
    fn default() -> Self {
        Self {
            max_elements: 40,
            max_text_length: 80,
        }
    }
}

impl PerceiverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }

    pub fn max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }
}
