//! # Authoring Mutations
//!
//! Graph editing operations for [`Dialogue`].
//!
//! All mutations are deterministic and keep the arena's id-stability
//! guarantee: a live node's id never changes, and removal of a non-trailing
//! node retains its slot as soft-deleted so later ids keep their meaning.
//!
//! Response targets are NOT validated here. Dangling references are a legal
//! transient state while authoring and are reported by the `validate`
//! module, or surfaced as `InvalidReference` when playback actually follows
//! the edge.

use crate::graph::Dialogue;
use crate::primitives::{
    MAX_NODES, MAX_RESPONSES_PER_SENTENCE, MAX_TEXT_LENGTH, MAX_TRIGGERS_PER_SENTENCE,
    MAX_TRIGGER_LENGTH,
};
use crate::{Actor, DialogueError, Node, NodeId, Response, Sentence, Variant};

impl Dialogue {
    // =========================================================================
    // NODE OPERATIONS
    // =========================================================================

    /// Add a node, recycling the lowest-id soft-deleted slot if one exists.
    ///
    /// The new sentence gets `actor` or, failing that, the dialogue's
    /// default actor, the given text, the Default variant, and no responses
    /// or triggers. Returns the id of the created (or recycled) node.
    pub fn add_node(
        &mut self,
        text: impl Into<String>,
        actor: Option<Actor>,
    ) -> Result<NodeId, DialogueError> {
        let text = text.into();
        check_text(&text)?;

        let mut sentence = Sentence::new(text, Variant::Default);
        sentence.actor = actor.or_else(|| self.default_actor.clone());

        if let Some(slot) = self.nodes.iter().position(|n| n.deleted) {
            let id = NodeId(slot);
            self.nodes[slot] = Node::new(id, sentence);
            return Ok(id);
        }

        if self.nodes.len() >= MAX_NODES {
            return Err(DialogueError::InvalidEdit(format!(
                "node count would exceed maximum {}",
                MAX_NODES
            )));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, sentence));
        Ok(id)
    }

    /// Remove a node and every edge touching it.
    ///
    /// Drops the node's own responses, then sweeps all other live nodes and
    /// removes every response whose `next_id` resolves to the removed node
    /// (all of them, not just the first). The trailing slot is physically
    /// popped; any other slot is soft-deleted so later ids stay valid.
    ///
    /// The graph is allowed to go empty, but callers are expected to retain
    /// at least one node in practice; playback needs a live Start.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), DialogueError> {
        match self.nodes.get(id.0) {
            Some(node) if !node.deleted => {}
            _ => return Err(DialogueError::InvalidReference(id)),
        }

        // Drop outgoing edges first so a soft-deleted slot never carries
        // stale responses back into a recycled node's neighbors.
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.sentence.responses.clear();
        }

        // O(nodes x responses) incoming-edge sweep.
        for node in &mut self.nodes {
            if node.deleted || node.id == id {
                continue;
            }
            node.sentence.responses.retain(|r| r.next_id != id);
        }

        if id.0 == self.nodes.len().saturating_sub(1) {
            self.nodes.pop();
        } else if let Some(node) = self.nodes.get_mut(id.0) {
            node.deleted = true;
        }

        Ok(())
    }

    // =========================================================================
    // RESPONSE OPERATIONS
    // =========================================================================

    /// Append a response to a sentence's display list.
    ///
    /// Rejected when the source node is missing or deleted, when the
    /// sentence is an End marker, or when the edit would mix the textless
    /// auto-advance sentinel with real choices. The target id is accepted
    /// unchecked.
    pub fn add_response(&mut self, from: NodeId, response: Response) -> Result<(), DialogueError> {
        check_text(&response.text)?;

        let sentence = self.sentence_mut(from)?;

        if sentence.variant == Variant::End {
            return Err(DialogueError::InvalidEdit(
                "an End sentence cannot have responses".to_string(),
            ));
        }
        if sentence.responses.len() >= MAX_RESPONSES_PER_SENTENCE {
            return Err(DialogueError::InvalidEdit(format!(
                "response count would exceed maximum {}",
                MAX_RESPONSES_PER_SENTENCE
            )));
        }
        if response.is_empty() && !sentence.responses.is_empty() {
            return Err(DialogueError::InvalidEdit(
                "the auto-advance sentinel must be the only response".to_string(),
            ));
        }
        if !response.is_empty() && sentence.responses.iter().any(Response::is_empty) {
            return Err(DialogueError::InvalidEdit(
                "cannot add a choice next to an auto-advance sentinel".to_string(),
            ));
        }

        sentence.responses.push(response);
        Ok(())
    }

    /// Remove a response by display index.
    pub fn remove_response(&mut self, from: NodeId, index: usize) -> Result<(), DialogueError> {
        let sentence = self.sentence_mut(from)?;
        if index >= sentence.responses.len() {
            return Err(DialogueError::InvalidChoice);
        }
        sentence.responses.remove(index);
        Ok(())
    }

    // =========================================================================
    // SENTENCE FIELD OPERATIONS
    // =========================================================================

    /// Replace a sentence's text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DialogueError> {
        let text = text.into();
        check_text(&text)?;
        self.sentence_mut(id)?.text = text;
        Ok(())
    }

    /// Change a sentence's variant.
    ///
    /// Switching to End clears the response list, upholding the invariant
    /// that End sentences carry no outgoing edges.
    pub fn set_variant(&mut self, id: NodeId, variant: Variant) -> Result<(), DialogueError> {
        let sentence = self.sentence_mut(id)?;
        sentence.variant = variant;
        if variant == Variant::End {
            sentence.responses.clear();
        }
        Ok(())
    }

    /// Assign a speaker and expression to a sentence.
    pub fn set_actor(
        &mut self,
        id: NodeId,
        actor: Option<Actor>,
        expression_index: usize,
    ) -> Result<(), DialogueError> {
        let sentence = self.sentence_mut(id)?;
        sentence.actor = actor;
        sentence.expression_index = expression_index;
        Ok(())
    }

    /// Append an entry trigger to a sentence.
    pub fn add_trigger(
        &mut self,
        id: NodeId,
        trigger: impl Into<String>,
    ) -> Result<(), DialogueError> {
        let trigger = trigger.into();
        if trigger.is_empty() || trigger.len() > MAX_TRIGGER_LENGTH {
            return Err(DialogueError::InvalidEdit(format!(
                "trigger must be 1..={} bytes",
                MAX_TRIGGER_LENGTH
            )));
        }
        let sentence = self.sentence_mut(id)?;
        if sentence.triggers.len() >= MAX_TRIGGERS_PER_SENTENCE {
            return Err(DialogueError::InvalidEdit(format!(
                "trigger count would exceed maximum {}",
                MAX_TRIGGERS_PER_SENTENCE
            )));
        }
        sentence.triggers.push(trigger);
        Ok(())
    }

    /// Drop all entry triggers from a sentence.
    pub fn clear_triggers(&mut self, id: NodeId) -> Result<(), DialogueError> {
        self.sentence_mut(id)?.triggers.clear();
        Ok(())
    }
}

fn check_text(text: &str) -> Result<(), DialogueError> {
    if text.len() > MAX_TEXT_LENGTH {
        return Err(DialogueError::InvalidEdit(format!(
            "text length {} exceeds maximum {}",
            text.len(),
            MAX_TEXT_LENGTH
        )));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn three_node_chain() -> (Dialogue, NodeId, NodeId, NodeId) {
        let mut dialogue = Dialogue::with_start("chain");
        let start = NodeId(0);
        let mid = dialogue.add_node("mid", None).expect("add");
        let end = dialogue.add_node("end", None).expect("add");
        dialogue
            .add_response(start, Response::auto(mid))
            .expect("link");
        dialogue
            .add_response(mid, Response::new("onward", end))
            .expect("link");
        (dialogue, start, mid, end)
    }

    #[test]
    fn add_node_appends_with_sequential_ids() {
        let mut dialogue = Dialogue::with_start("ids");
        let a = dialogue.add_node("a", None).expect("add");
        let b = dialogue.add_node("b", None).expect("add");
        assert_eq!(a, NodeId(1));
        assert_eq!(b, NodeId(2));
        assert_eq!(dialogue.len(), 3);
    }

    #[test]
    fn add_node_applies_default_actor() {
        let mut dialogue = Dialogue::with_start("actors");
        dialogue.default_actor = Some(Actor::new("Narrator"));

        let inherited = dialogue.add_node("line", None).expect("add");
        let explicit = dialogue
            .add_node("line", Some(Actor::new("Mira")))
            .expect("add");

        let inherited = dialogue.sentence(inherited).expect("sentence");
        assert_eq!(
            inherited.actor.as_ref().map(|a| a.title.as_str()),
            Some("Narrator")
        );
        let explicit = dialogue.sentence(explicit).expect("sentence");
        assert_eq!(
            explicit.actor.as_ref().map(|a| a.title.as_str()),
            Some("Mira")
        );
    }

    #[test]
    fn add_node_recycles_lowest_deleted_slot() {
        let mut dialogue = Dialogue::with_start("recycle");
        let a = dialogue.add_node("a", None).expect("add");
        let b = dialogue.add_node("b", None).expect("add");
        dialogue.add_node("tail", None).expect("add");

        dialogue.remove_node(a).expect("remove");
        dialogue.remove_node(b).expect("remove");

        // Lowest deleted slot first, then the next one; no fresh appends
        // until all holes are filled.
        let first = dialogue.add_node("first", None).expect("add");
        let second = dialogue.add_node("second", None).expect("add");
        let fresh = dialogue.add_node("fresh", None).expect("add");

        assert_eq!(first, a);
        assert_eq!(second, b);
        assert_eq!(fresh, NodeId(4));
        assert_eq!(dialogue.deleted_count(), 0);
    }

    #[test]
    fn recycled_node_is_clean() {
        let mut dialogue = Dialogue::with_start("clean");
        let a = dialogue.add_node("old", None).expect("add");
        let b = dialogue.add_node("target", None).expect("add");
        dialogue
            .add_response(a, Response::new("stale", b))
            .expect("link");
        dialogue.add_trigger(a, "music old").expect("trigger");
        dialogue.add_node("tail", None).expect("add");
        dialogue.remove_node(a).expect("remove");

        let recycled = dialogue.add_node("new", None).expect("add");
        assert_eq!(recycled, a);
        let sentence = dialogue.sentence(recycled).expect("sentence");
        assert_eq!(sentence.text, "new");
        assert!(sentence.responses.is_empty());
        assert!(sentence.triggers.is_empty());
        assert_eq!(sentence.variant, Variant::Default);
    }

    #[test]
    fn remove_trailing_node_pops_the_slot() {
        let (mut dialogue, _, _, end) = three_node_chain();
        dialogue.remove_node(end).expect("remove");
        assert_eq!(dialogue.len(), 2);
        assert_eq!(dialogue.deleted_count(), 0);
    }

    #[test]
    fn remove_inner_node_soft_deletes() {
        let (mut dialogue, _, mid, end) = three_node_chain();
        dialogue.remove_node(mid).expect("remove");
        assert_eq!(dialogue.len(), 3);
        assert_eq!(dialogue.deleted_count(), 1);
        // The trailing node keeps its id.
        assert_eq!(dialogue.node(end).expect("node").id, end);
    }

    #[test]
    fn remove_node_sweeps_incoming_edges() {
        let (mut dialogue, start, mid, _) = three_node_chain();
        dialogue.remove_node(mid).expect("remove");

        let start_sentence = dialogue.sentence(start).expect("sentence");
        assert!(start_sentence.responses.is_empty());
    }

    #[test]
    fn remove_node_sweeps_duplicate_edges() {
        // Two responses on one node pointing at the same target: both go.
        let mut dialogue = Dialogue::with_start("dup");
        let target = dialogue.add_node("target", None).expect("add");
        let other = dialogue.add_node("other", None).expect("add");
        dialogue
            .add_response(NodeId(0), Response::new("a", target))
            .expect("link");
        dialogue
            .add_response(NodeId(0), Response::new("b", target))
            .expect("link");
        dialogue
            .add_response(NodeId(0), Response::new("c", other))
            .expect("link");
        dialogue.add_node("tail", None).expect("add");

        dialogue.remove_node(target).expect("remove");

        let responses = &dialogue.sentence(NodeId(0)).expect("sentence").responses;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].next_id, other);
    }

    #[test]
    fn remove_node_twice_fails() {
        let (mut dialogue, _, mid, _) = three_node_chain();
        dialogue.remove_node(mid).expect("remove");
        assert!(matches!(
            dialogue.remove_node(mid),
            Err(DialogueError::InvalidReference(_))
        ));
    }

    #[test]
    fn remove_last_remaining_node_empties_the_graph() {
        // Tolerated: the graph may go empty transiently.
        let mut dialogue = Dialogue::with_start("solo");
        dialogue.remove_node(NodeId(0)).expect("remove");
        assert!(dialogue.is_empty());
    }

    #[test]
    fn add_response_rejects_end_sentences() {
        let mut dialogue = Dialogue::with_start("ends");
        let end = dialogue.add_node("end", None).expect("add");
        dialogue.set_variant(end, Variant::End).expect("set");

        assert!(matches!(
            dialogue.add_response(end, Response::new("no", NodeId(0))),
            Err(DialogueError::InvalidEdit(_))
        ));
    }

    #[test]
    fn add_response_rejects_mixing_sentinel_with_choices() {
        let mut dialogue = Dialogue::with_start("mix");
        let a = dialogue.add_node("a", None).expect("add");
        let b = dialogue.add_node("b", None).expect("add");

        dialogue.add_response(a, Response::auto(b)).expect("auto");
        assert!(matches!(
            dialogue.add_response(a, Response::new("choice", b)),
            Err(DialogueError::InvalidEdit(_))
        ));
        assert!(matches!(
            dialogue.add_response(a, Response::auto(b)),
            Err(DialogueError::InvalidEdit(_))
        ));

        let c = dialogue.add_node("c", None).expect("add");
        dialogue
            .add_response(c, Response::new("choice", b))
            .expect("choice");
        assert!(matches!(
            dialogue.add_response(c, Response::auto(b)),
            Err(DialogueError::InvalidEdit(_))
        ));
    }

    #[test]
    fn add_response_accepts_dangling_target() {
        // Structural checking is lazy: authoring may point anywhere.
        let mut dialogue = Dialogue::with_start("dangling");
        dialogue
            .add_response(NodeId(0), Response::new("into the void", NodeId(99)))
            .expect("link");
    }

    #[test]
    fn remove_response_by_index() {
        let mut dialogue = Dialogue::with_start("unlink");
        let a = dialogue.add_node("a", None).expect("add");
        dialogue
            .add_response(NodeId(0), Response::new("one", a))
            .expect("link");
        dialogue
            .add_response(NodeId(0), Response::new("two", a))
            .expect("link");

        dialogue.remove_response(NodeId(0), 0).expect("unlink");
        let responses = &dialogue.sentence(NodeId(0)).expect("sentence").responses;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].text, "two");

        assert!(matches!(
            dialogue.remove_response(NodeId(0), 5),
            Err(DialogueError::InvalidChoice)
        ));
    }

    #[test]
    fn set_variant_end_clears_responses() {
        let mut dialogue = Dialogue::with_start("clears");
        let a = dialogue.add_node("a", None).expect("add");
        dialogue
            .add_response(a, Response::new("out", NodeId(0)))
            .expect("link");

        dialogue.set_variant(a, Variant::End).expect("set");
        let sentence = dialogue.sentence(a).expect("sentence");
        assert_eq!(sentence.variant, Variant::End);
        assert!(sentence.responses.is_empty());
    }

    #[test]
    fn trigger_edits_validate_input() {
        let mut dialogue = Dialogue::with_start("triggers");
        assert!(matches!(
            dialogue.add_trigger(NodeId(0), ""),
            Err(DialogueError::InvalidEdit(_))
        ));

        dialogue.add_trigger(NodeId(0), "music intro").expect("add");
        dialogue.add_trigger(NodeId(0), "sound door").expect("add");
        assert_eq!(dialogue.sentence(NodeId(0)).expect("s").triggers.len(), 2);

        dialogue.clear_triggers(NodeId(0)).expect("clear");
        assert!(dialogue.sentence(NodeId(0)).expect("s").triggers.is_empty());
    }

    #[test]
    fn overlong_text_rejected() {
        let mut dialogue = Dialogue::with_start("long");
        let text = "x".repeat(MAX_TEXT_LENGTH + 1);
        assert!(matches!(
            dialogue.add_node(text, None),
            Err(DialogueError::InvalidEdit(_))
        ));
    }
}
