//! # Core Type Definitions
//!
//! This module contains all core types for the Prattle dialogue graph:
//! - Node addressing (`NodeId`)
//! - Edge and content types (`Response`, `Sentence`, `Variant`)
//! - The graph vertex (`Node`)
//! - Speaker data (`Actor`, `Expression`)
//! - Error types (`DialogueError`)
//!
//! ## Identity Guarantees
//!
//! A `NodeId` doubles as the node's slot index in the owning dialogue's
//! arena. Ids are stable for the lifetime of the dialogue: removal never
//! shifts surviving slots (see soft deletion in the graph module), so a
//! `Response::next_id` written at authoring time stays valid until its
//! target is removed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// NODE ADDRESSING
// =============================================================================

/// Handle to a node within a single [`Dialogue`](crate::Dialogue).
///
/// The id equals the node's position in the arena at creation time and is
/// never reassigned to a different live node. Handles are plain data; they
/// must be resolved through the owning dialogue and can go stale when the
/// target node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Get the raw index value.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// SPEAKER DATA
// =============================================================================

/// A named facial/vocal expression of an actor.
///
/// Presentation assets (sprites, audio) live in the host application; the
/// engine only carries the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    /// Display name of the expression ("neutral", "angry", ...).
    pub title: String,
}

impl Expression {
    /// Create a new expression.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// A speaker in a dialogue.
///
/// Actors are opaque handles from the engine's point of view: a title plus
/// an indexed list of expressions. Everything else about a character is the
/// host's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Actor {
    /// Display name of the actor.
    pub title: String,
    /// Named expressions, addressed by index from sentences.
    pub expressions: Vec<Expression>,
}

impl Actor {
    /// Create a new actor with no expressions.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            expressions: Vec::new(),
        }
    }

    /// Lookup an expression by index.
    #[must_use]
    pub fn expression(&self, index: usize) -> Option<&Expression> {
        self.expressions.get(index)
    }
}

// =============================================================================
// RESPONSE (EDGE)
// =============================================================================

/// A directed edge from one sentence to another.
///
/// A response with empty text is the auto-advance sentinel: playback follows
/// `next_id` without offering a choice. A response with text is a
/// player-facing choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Display text; the empty string means "no real choice, auto-advance".
    pub text: String,
    /// Target node id in the owning dialogue.
    pub next_id: NodeId,
    /// Side effect dispatched when this response is chosen.
    pub trigger: Option<String>,
    /// Free-form visibility predicate, interpreted by the host.
    pub condition: Option<String>,
}

impl Response {
    /// Create a response leading to `next_id`.
    #[must_use]
    pub fn new(text: impl Into<String>, next_id: NodeId) -> Self {
        Self {
            text: text.into(),
            next_id,
            trigger: None,
            condition: None,
        }
    }

    /// Create the auto-advance sentinel leading to `next_id`.
    #[must_use]
    pub fn auto(next_id: NodeId) -> Self {
        Self::new("", next_id)
    }

    /// Attach a choice-time trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Attach a visibility condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Check if this response carries no choice text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

// =============================================================================
// SENTENCE (NODE CONTENT)
// =============================================================================

/// Structural role of a sentence within its dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Ordinary line.
    #[default]
    Default,
    /// Entry point of the dialogue. Exactly one live Start node is expected.
    Start,
    /// Terminal marker. End sentences carry no responses and fire no triggers.
    End,
}

/// The content of one dialogue turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Sentence {
    /// The speaker, if any.
    pub actor: Option<Actor>,
    /// Index into the speaker's expression list.
    pub expression_index: usize,
    /// The spoken line.
    pub text: String,
    /// Structural role.
    pub variant: Variant,
    /// Side effects fired, in order, when this sentence becomes current.
    pub triggers: Vec<String>,
    /// Outgoing edges; insertion order is display order.
    pub responses: Vec<Response>,
}

impl Sentence {
    /// Create a sentence with the given text and variant.
    #[must_use]
    pub fn new(text: impl Into<String>, variant: Variant) -> Self {
        Self {
            text: text.into(),
            variant,
            ..Self::default()
        }
    }

    /// Get a response by display index.
    #[must_use]
    pub fn response(&self, index: usize) -> Option<&Response> {
        self.responses.get(index)
    }

    /// Get the first response.
    #[must_use]
    pub fn first_response(&self) -> Option<&Response> {
        self.responses.first()
    }

    /// Resolve this sentence's expression against its actor.
    #[must_use]
    pub fn expression(&self) -> Option<&Expression> {
        self.actor.as_ref()?.expression(self.expression_index)
    }

    /// The sentence offers a real choice to the player.
    #[must_use]
    pub fn has_choice(&self) -> bool {
        self.first_response().is_some_and(|r| !r.is_empty())
    }

    /// The sentence silently follows its sole, textless response.
    #[must_use]
    pub fn has_auto_advance(&self) -> bool {
        self.responses.len() == 1 && self.first_response().is_some_and(Response::is_empty)
    }

    /// The sentence has no outgoing edges.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.responses.is_empty()
    }
}

// =============================================================================
// NODE (GRAPH VERTEX)
// =============================================================================

/// A slot in the dialogue's node arena.
///
/// Removal soft-deletes non-trailing nodes: the slot is retained (so other
/// nodes' `next_id` indices stay meaningful) and may be recycled by a later
/// node insertion, which reuses the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Stable id, equal to the slot index.
    pub id: NodeId,
    /// The owned content.
    pub sentence: Sentence,
    /// Soft-delete marker.
    pub deleted: bool,
}

impl Node {
    /// Create a live node.
    #[must_use]
    pub fn new(id: NodeId, sentence: Sentence) -> Self {
        Self {
            id,
            sentence,
            deleted: false,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Prattle engine.
///
/// - No silent failures
/// - Use `Result<T, DialogueError>` for fallible operations
/// - The engine never panics; all errors are recoverable at the graph level
///   even when fatal to an individual playback session
#[derive(Debug, Error)]
pub enum DialogueError {
    /// A response or lookup references a node id outside bounds or pointing
    /// at a soft-deleted slot. Fatal to the running session, harmless to the
    /// dialogue itself.
    #[error("node reference out of range or deleted: {0:?}")]
    InvalidReference(NodeId),

    /// No live Start sentence exists in the dialogue.
    #[error("dialogue has no start sentence")]
    NoStartNode,

    /// A playback session is already active; end it before starting another.
    #[error("a dialogue session is already active")]
    SessionAlreadyActive,

    /// The chosen response does not belong to the current sentence.
    #[error("response does not belong to the current sentence")]
    InvalidChoice,

    /// A trigger handler reported a failure; the session is aborted.
    #[error("trigger handler rejected '{trigger}': {reason}")]
    TriggerFailed {
        /// The trigger token that was being dispatched.
        trigger: String,
        /// Handler-provided failure description.
        reason: String,
    },

    /// An authoring mutation was rejected.
    #[error("invalid edit: {0}")]
    InvalidEdit(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred (surfaced by the app layer).
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_is_sentinel() {
        let auto = Response::auto(NodeId(3));
        assert!(auto.is_empty());

        let choice = Response::new("Sure.", NodeId(3));
        assert!(!choice.is_empty());
    }

    #[test]
    fn sentence_predicates_terminal() {
        let s = Sentence::new("Bye.", Variant::Default);
        assert!(s.is_terminal());
        assert!(!s.has_auto_advance());
        assert!(!s.has_choice());
    }

    #[test]
    fn sentence_predicates_auto_advance() {
        let mut s = Sentence::new("...", Variant::Default);
        s.responses.push(Response::auto(NodeId(1)));
        assert!(s.has_auto_advance());
        assert!(!s.has_choice());
        assert!(!s.is_terminal());
    }

    #[test]
    fn sentence_predicates_choice() {
        let mut s = Sentence::new("Well?", Variant::Default);
        s.responses.push(Response::new("Yes", NodeId(1)));
        s.responses.push(Response::new("No", NodeId(2)));
        assert!(s.has_choice());
        assert!(!s.has_auto_advance());
        assert!(!s.is_terminal());
    }

    #[test]
    fn adding_choice_after_sentinel_keeps_predicates_exclusive() {
        // First ordering: sentinel stays first. None of the three states
        // hold, but they never overlap.
        let mut s = Sentence::new("...", Variant::Default);
        s.responses.push(Response::auto(NodeId(1)));
        s.responses.push(Response::new("Hi", NodeId(2)));
        assert!(!s.has_choice());
        assert!(!s.has_auto_advance());
        assert!(!s.is_terminal());

        // Second ordering: a real choice in front flips has_choice.
        let mut s = Sentence::new("...", Variant::Default);
        s.responses.push(Response::new("Hi", NodeId(2)));
        s.responses.push(Response::auto(NodeId(1)));
        assert!(s.has_choice());
        assert!(!s.has_auto_advance());
        assert!(!s.is_terminal());
    }

    #[test]
    fn expression_resolves_through_actor() {
        let mut actor = Actor::new("Mira");
        actor.expressions.push(Expression::new("neutral"));
        actor.expressions.push(Expression::new("angry"));

        let mut s = Sentence::new("Hmpf.", Variant::Default);
        s.actor = Some(actor);
        s.expression_index = 1;

        assert_eq!(s.expression().map(|e| e.title.as_str()), Some("angry"));
    }

    #[test]
    fn expression_index_out_of_range_is_none() {
        let mut s = Sentence::new("?", Variant::Default);
        s.actor = Some(Actor::new("Mira"));
        s.expression_index = 7;
        assert!(s.expression().is_none());
    }

    #[test]
    fn error_display_names_the_node() {
        let err = DialogueError::InvalidReference(NodeId(12));
        assert!(err.to_string().contains("12"));
    }
}
