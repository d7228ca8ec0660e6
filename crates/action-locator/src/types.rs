//! Core types for selector matching

use serde::{Deserialize, Serialize};

/// Selector signal enumeration
///
/// One per selector field, in descending weight order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchSignal {
    /// Exact snapshot id
    NodeId,

    /// Substring of visible text
    Text,

    /// Substring of the accessible label
    ContentDesc,

    /// Substring of the view/resource identifier
    Identifier,
}

impl MatchSignal {
    /// Get signal name as string
    pub fn name(&self) -> &'static str {
        match self {
            MatchSignal::NodeId => "node_id",
            MatchSignal::Text => "text",
            MatchSignal::ContentDesc => "content_desc",
            MatchSignal::Identifier => "identifier",
        }
    }

    /// Score contributed when the signal matches
    pub fn weight(&self) -> u32 {
        match self {
            MatchSignal::NodeId => 100,
            MatchSignal::Text => 40,
            MatchSignal::ContentDesc => 35,
            MatchSignal::Identifier => 30,
        }
    }
}

/// Scored node that survived actionability resolution
#[derive(Debug, Clone)]
pub struct Candidate<N> {
    /// Node the click should land on
    pub actionable: N,

    /// Snapshot id of the scored node, if it was interest-worthy
    pub snapshot_id: Option<String>,

    /// Sum of matched signal weights
    pub score: u32,

    /// True when `actionable` is an ancestor of the scored node
    pub used_ancestor_fallback: bool,
}

/// Outcome of a successful selector resolution
#[derive(Debug, Clone)]
pub struct MatchResult<N> {
    pub node: N,
    pub matched_snapshot_id: Option<String>,
    pub used_ancestor_fallback: bool,
    pub score: u32,
}

impl<N> From<Candidate<N>> for MatchResult<N> {
    fn from(candidate: Candidate<N>) -> Self {
        Self {
            node: candidate.actionable,
            matched_snapshot_id: candidate.snapshot_id,
            used_ancestor_fallback: candidate.used_ancestor_fallback,
            score: candidate.score,
        }
    }
}
