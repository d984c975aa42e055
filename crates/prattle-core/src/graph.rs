//! # Dialogue Graph
//!
//! The node arena for a single dialogue.
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`], which equals the
//! slot index. Removal soft-deletes non-trailing slots instead of shifting
//! the arena, so ids stay stable and every `Response::next_id` written at
//! authoring time keeps its meaning. Authoring mutations live in the
//! `mutation` module; this module holds the structure and its queries.

use crate::{DialogueError, Node, NodeId, Sentence, Variant};
use serde::{Deserialize, Serialize};

/// A branching dialogue: an ordered arena of sentence nodes plus metadata.
///
/// The dialogue exclusively owns its nodes, sentences, and responses. A
/// `Response::next_id` is a weak index into the same arena, never ownership.
///
/// Structural errors (a response pointing at a removed slot) are detected
/// lazily at traversal time, mirroring the permissive editing model; run
/// [`validate`](crate::validate::validate) for an eager report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Dialogue {
    /// Display name of this dialogue.
    pub title: String,
    /// Applied to newly created nodes that don't name their own speaker.
    pub default_actor: Option<crate::Actor>,
    pub(crate) nodes: Vec<Node>,
}

impl Dialogue {
    /// Create an empty dialogue.
    ///
    /// Most callers want [`Dialogue::with_start`]; playback requires a live
    /// Start node, and the authoring tools are expected to keep at least one
    /// node in the graph.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            default_actor: None,
            nodes: Vec::new(),
        }
    }

    /// Create a dialogue seeded with a default Start node.
    #[must_use]
    pub fn with_start(title: impl Into<String>) -> Self {
        let mut dialogue = Self::new(title);
        dialogue
            .nodes
            .push(Node::new(NodeId(0), Sentence::new("", Variant::Start)));
        dialogue
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Lookup a node slot by id. Bounds-checked only: the slot may be
    /// soft-deleted, which is the caller's concern to check.
    pub fn node(&self, id: NodeId) -> Result<&Node, DialogueError> {
        self.nodes
            .get(id.0)
            .ok_or(DialogueError::InvalidReference(id))
    }

    /// Lookup a sentence by node id. Same bounds semantics as [`Self::node`].
    pub fn sentence(&self, id: NodeId) -> Result<&Sentence, DialogueError> {
        self.node(id).map(|n| &n.sentence)
    }

    /// Mutable sentence access for direct authoring edits.
    ///
    /// Unlike [`Self::sentence`], this also rejects soft-deleted slots:
    /// editing a deleted node is always a bug in the calling tool.
    pub fn sentence_mut(&mut self, id: NodeId) -> Result<&mut Sentence, DialogueError> {
        match self.nodes.get_mut(id.0) {
            Some(node) if !node.deleted => Ok(&mut node.sentence),
            _ => Err(DialogueError::InvalidReference(id)),
        }
    }

    /// Find the entry point: the first live node with the Start variant.
    ///
    /// More than one live Start is an authoring mistake surfaced by
    /// validation; this query deterministically picks the lowest id.
    pub fn find_start(&self) -> Result<NodeId, DialogueError> {
        self.live_nodes()
            .find(|n| n.sentence.variant == Variant::Start)
            .map(|n| n.id)
            .ok_or(DialogueError::NoStartNode)
    }

    /// Get the Start sentence.
    pub fn start(&self) -> Result<&Sentence, DialogueError> {
        let id = self.find_start()?;
        self.sentence(id)
    }

    // =========================================================================
    // ITERATION
    // =========================================================================

    /// All node slots in id order, soft-deleted included.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Live (non-deleted) nodes in id order.
    pub fn live_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.deleted)
    }

    // =========================================================================
    // COUNTS
    // =========================================================================

    /// Number of node slots, soft-deleted included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the arena holds no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of live sentences.
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.live_nodes().count()
    }

    /// Number of soft-deleted slots.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.deleted).count()
    }

    /// Total number of responses across live sentences.
    #[must_use]
    pub fn response_count(&self) -> usize {
        self.live_nodes().map(|n| n.sentence.responses.len()).sum()
    }

    /// Number of live sentences with the given variant.
    #[must_use]
    pub fn variant_count(&self, variant: Variant) -> usize {
        self.live_nodes()
            .filter(|n| n.sentence.variant == variant)
            .count()
    }
}

impl std::fmt::Display for Dialogue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dialogue '{}'", self.title)
    }
}

// =============================================================================
// TESTS
// =============================================================================
