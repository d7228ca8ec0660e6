//! Selector resolution over a live tree

use std::ops::ControlFlow;

use tracing::debug;

use perceiver_structural::{is_of_interest, walk_tree, UiNode};
use screenpilot_core_types::Selector;

use crate::strategies::score_node;
use crate::types::{Candidate, MatchResult};

/// Default number of ancestors inspected when a scored node is not clickable.
pub const MAX_PARENT_DEPTH: usize = 8;

/// Resolves selectors against a tree.
#[derive(Debug, Clone)]
pub struct ElementMatcher {
    max_parent_depth: usize,
}

impl Default for ElementMatcher {
    fn default() -> Self {
        Self {
            max_parent_depth: MAX_PARENT_DEPTH,
        }
    }
}

impl ElementMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_parent_depth(mut self, depth: usize) -> Self {
        self.max_parent_depth = depth;
        self
    }

    /// Best actionable node for `selector`, or `None` when nothing qualifies.
    pub fn find_best_match<N: UiNode>(&self, root: &N, selector: &Selector) -> Option<MatchResult<N>> {
        if !selector.has_any_signal() {
            return None;
        }

        let mut candidates = Vec::new();
        walk_tree(root, is_of_interest, |visit| {
            let Some(score) = score_node(selector, visit.attributes, visit.snapshot_id) else {
                return ControlFlow::Continue(());
            };

            let resolved = if visit.attributes.is_actionable() {
                Some((visit.node.clone(), false))
            } else {
                self.actionable_ancestor(visit.node).map(|node| (node, true))
            };

            match resolved {
                Some((actionable, used_ancestor_fallback)) => candidates.push(Candidate {
                    actionable,
                    snapshot_id: visit.snapshot_id.map(str::to_string),
                    score,
                    used_ancestor_fallback,
                }),
                None => debug!(
                    snapshot_id = visit.snapshot_id.unwrap_or("-"),
                    score, "scored node has no actionable ancestor; dropped"
                ),
            }
            ControlFlow::Continue(())
        });

        let best = select_best_candidate(candidates)?;
        debug!(
            snapshot_id = best.snapshot_id.as_deref().unwrap_or("-"),
            score = best.score,
            fallback = best.used_ancestor_fallback,
            "selector resolved"
        );
        Some(best.into())
    }

    fn actionable_ancestor<N: UiNode>(&self, node: &N) -> Option<N> {
        let mut current = node.parent();
        for _ in 0..self.max_parent_depth {
            let ancestor = current?;
            if ancestor.attributes().is_actionable() {
                return Some(ancestor);
            }
            current = ancestor.parent();
        }
        None
    }
}

/// Free-function form using the default ancestor depth.
pub fn find_best_match<N: UiNode>(root: &N, selector: &Selector) -> Option<MatchResult<N>> {
    ElementMatcher::default().find_best_match(root, selector)
}

/// Highest score wins; on equal scores a direct match beats an ancestor
/// fallback, otherwise the earlier candidate in traversal order is kept.
fn select_best_candidate<N>(candidates: Vec<Candidate<N>>) -> Option<Candidate<N>> {
    let mut best: Option<Candidate<N>> = None;
    for candidate in candidates {
        let replace = match &best {
            None => true,
            Some(current) => {
                candidate.score > current.score
                    || (candidate.score == current.score
                        && current.used_ancestor_fallback
                        && !candidate.used_ancestor_fallback)
            }
        };
        if replace {
            best = Some(candidate);
        }
    }
    best
}
