//! Per-node scoring
//!
//! Every set selector field is a hard requirement: a node that lacks the
//! attribute or does not contain the value is disqualified outright.

use screenpilot_core_types::{NodeAttributes, Selector};

use crate::types::MatchSignal;

/// Scores one node against `selector`.
///
/// Returns `None` when any set field fails or when nothing matched.
pub fn score_node(
    selector: &Selector,
    attributes: &NodeAttributes,
    snapshot_id: Option<&str>,
) -> Option<u32> {
    let mut score = 0;

    if let Some(expected) = selector.node_id_signal() {
        if snapshot_id != Some(expected) {
            return None;
        }
        score += MatchSignal::NodeId.weight();
    }

    let substring_signals = [
        (
            MatchSignal::Text,
            selector.text_signal(),
            attributes.text.as_deref(),
        ),
        (
            MatchSignal::ContentDesc,
            selector.content_desc_signal(),
            attributes.accessible_label.as_deref(),
        ),
        (
            MatchSignal::Identifier,
            selector.identifier_signal(),
            attributes.identifier.as_deref(),
        ),
    ];

    for (signal, needle, haystack) in substring_signals {
        let Some(needle) = needle else { continue };
        if !contains_ignore_case(haystack?, needle) {
            return None;
        }
        score += signal.weight();
    }

    (score > 0).then_some(score)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
