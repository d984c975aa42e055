//! # Eager Graph Validation
//!
//! Playback detects structural problems lazily, when an edge is actually
//! followed. Authoring tools usually want the full picture up front; this
//! module walks the whole dialogue and reports every issue it can find.
//!
//! Issues are warnings, not errors: a dialogue that fails validation is
//! still loadable and editable, it just may not play to the end.

use crate::graph::Dialogue;
use crate::{NodeId, Response, Variant};

/// A single finding from [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// No live Start sentence; playback cannot begin.
    NoStart,
    /// More than one live Start sentence; playback picks the lowest id.
    MultipleStarts(usize),
    /// A response points outside the arena or at a soft-deleted slot.
    DanglingReference {
        /// The node owning the response.
        node: NodeId,
        /// Display index of the offending response.
        response: usize,
        /// The unresolvable target.
        target: NodeId,
    },
    /// An End sentence carries responses; they are unreachable.
    EndWithResponses(NodeId),
    /// The auto-advance sentinel sits next to real choices.
    MixedResponses(NodeId),
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoStart => write!(f, "dialogue has no start sentence"),
            Self::MultipleStarts(count) => {
                write!(f, "dialogue has {} start sentences, expected 1", count)
            }
            Self::DanglingReference {
                node,
                response,
                target,
            } => write!(
                f,
                "node {} response {} points at missing or deleted node {}",
                node, response, target
            ),
            Self::EndWithResponses(node) => {
                write!(f, "end sentence {} carries responses", node)
            }
            Self::MixedResponses(node) => write!(
                f,
                "node {} mixes the auto-advance sentinel with real choices",
                node
            ),
        }
    }
}

/// Validate a dialogue and return every issue found, in node order.
///
/// An empty report means the dialogue plays cleanly from Start for any
/// sequence of choices.
#[must_use]
pub fn validate(dialogue: &Dialogue) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match dialogue.variant_count(Variant::Start) {
        0 => issues.push(ValidationIssue::NoStart),
        1 => {}
        count => issues.push(ValidationIssue::MultipleStarts(count)),
    }

    for node in dialogue.live_nodes() {
        let sentence = &node.sentence;

        if sentence.variant == Variant::End && !sentence.responses.is_empty() {
            issues.push(ValidationIssue::EndWithResponses(node.id));
        }

        let has_sentinel = sentence.responses.iter().any(Response::is_empty);
        let has_choice_text = sentence.responses.iter().any(|r| !r.is_empty());
        if has_sentinel && (has_choice_text || sentence.responses.len() > 1) {
            issues.push(ValidationIssue::MixedResponses(node.id));
        }

        for (index, response) in sentence.responses.iter().enumerate() {
            let resolvable = dialogue
                .node(response.next_id)
                .map(|target| !target.deleted)
                .unwrap_or(false);
            if !resolvable {
                issues.push(ValidationIssue::DanglingReference {
                    node: node.id,
                    response: index,
                    target: response.next_id,
                });
            }
        }
    }

    issues
}

// =============================================================================
// TESTS
// =============================================================================
