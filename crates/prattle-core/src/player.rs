//! # Playback State Machine
//!
//! [`DialoguePlayer`] walks a [`Dialogue`] sentence-by-sentence, driven
//! entirely by caller-invoked methods: `start`, `choose`, and `advance`.
//! There is no internal scheduling; the delay between a sentence becoming
//! current and the host reporting back (typing effects, animation, user
//! input) is a suspension point owned by the view.
//!
//! ## Session lifecycle
//!
//! `Idle` -> `start` -> `Active` -> (terminal sentence, End marker, or
//! fatal error) -> `Idle`. Exactly one session runs at a time; a second
//! `start` is rejected, not queued.
//!
//! The player holds the dialogue behind an `Arc`, so the caller keeps
//! ownership while the borrow checker rules out edits to the graph for as
//! long as the session is alive.

use crate::trigger::TriggerHandler;
use crate::{Dialogue, DialogueError, NodeId, Sentence, Variant};
use std::sync::Arc;

// =============================================================================
// VIEW COLLABORATOR
// =============================================================================

/// Presentation callbacks consumed by the player.
///
/// `sentence_entered` begins presentation and does not block; the view is
/// expected to eventually call back [`DialoguePlayer::advance`] (for
/// auto-advance and terminal sentences) or [`DialoguePlayer::choose`]
/// (when the user picks from the current responses).
pub trait SentenceView {
    /// A sentence became current. Its triggers have already fired.
    fn sentence_entered(&mut self, sentence: &Sentence);

    /// The session ended; hide or tear down the presentation.
    fn session_ended(&mut self);
}

/// A view that ignores every notification, for headless hosts and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl SentenceView for NullView {
    fn sentence_entered(&mut self, _sentence: &Sentence) {}
    fn session_ended(&mut self) {}
}

// =============================================================================
// PLAYER
// =============================================================================

/// Playback state of a [`DialoguePlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No dialogue attached.
    #[default]
    Idle,
    /// A session is running and a current sentence is set.
    Active,
}

#[derive(Debug)]
struct ActiveSession {
    dialogue: Arc<Dialogue>,
    current: NodeId,
}

/// The runtime that turns a static dialogue graph into an interactive
/// conversation.
///
/// Generic over its two collaborators: the view (presentation) and the
/// trigger handler (side effects). Both are owned by the player so that
/// callbacks need no external wiring per call.
pub struct DialoguePlayer<V, T> {
    view: V,
    triggers: T,
    session: Option<ActiveSession>,
}

impl<V: SentenceView, T: TriggerHandler> DialoguePlayer<V, T> {
    /// Create an idle player.
    pub fn new(view: V, triggers: T) -> Self {
        Self {
            view,
            triggers,
            session: None,
        }
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    /// Check whether a session is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Id of the current sentence's node, if a session is active.
    #[must_use]
    pub fn current_id(&self) -> Option<NodeId> {
        self.session.as_ref().map(|s| s.current)
    }

    /// The current sentence, if a session is active.
    #[must_use]
    pub fn current(&self) -> Option<&Sentence> {
        let session = self.session.as_ref()?;
        session.dialogue.sentence(session.current).ok()
    }

    /// Borrow the view collaborator.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutably borrow the view collaborator.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Borrow the trigger handler.
    pub fn triggers(&self) -> &T {
        &self.triggers
    }

    /// Mutably borrow the trigger handler.
    pub fn triggers_mut(&mut self) -> &mut T {
        &mut self.triggers
    }

    // =========================================================================
    // STATE TRANSITIONS
    // =========================================================================

    /// Start a session on `dialogue` at its Start sentence.
    ///
    /// Fails with [`DialogueError::SessionAlreadyActive`] while a session
    /// runs (the running session is untouched) and with
    /// [`DialogueError::NoStartNode`] when the dialogue has no live Start
    /// node (the player stays idle, no callbacks fire).
    pub fn start(&mut self, dialogue: Arc<Dialogue>) -> Result<(), DialogueError> {
        if self.session.is_some() {
            return Err(DialogueError::SessionAlreadyActive);
        }

        let start = dialogue.find_start()?;
        self.session = Some(ActiveSession {
            dialogue,
            current: start,
        });
        self.show(start)
    }

    /// Advance past a sentence that offers no real choice.
    ///
    /// Called by the view once the current sentence's presentation has
    /// finished. An auto-advance sentence follows its sole textless
    /// response; a terminal sentence (or anything else) ends the session.
    /// A no-op when idle.
    pub fn advance(&mut self) -> Result<(), DialogueError> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        let dialogue = Arc::clone(&session.dialogue);
        let current = session.current;

        let Ok(sentence) = dialogue.sentence(current) else {
            return Err(self.abort(DialogueError::InvalidReference(current)));
        };

        if sentence.has_auto_advance() {
            match sentence.first_response() {
                Some(response) => {
                    let next = response.next_id;
                    self.show(next)
                }
                None => Err(self.abort(DialogueError::InvalidReference(current))),
            }
        } else {
            self.end_session();
            Ok(())
        }
    }

    /// Choose a response from the current sentence by display index.
    ///
    /// Fails with [`DialogueError::InvalidChoice`] when idle or when the
    /// index does not address one of the current responses; no state
    /// changes and no callbacks fire in that case. The response's trigger
    /// (if any) is dispatched exactly once, before the transition.
    pub fn choose(&mut self, index: usize) -> Result<(), DialogueError> {
        let Some(session) = &self.session else {
            return Err(DialogueError::InvalidChoice);
        };
        let dialogue = Arc::clone(&session.dialogue);
        let current = session.current;

        let Ok(sentence) = dialogue.sentence(current) else {
            return Err(self.abort(DialogueError::InvalidReference(current)));
        };
        let Some(response) = sentence.response(index) else {
            return Err(DialogueError::InvalidChoice);
        };

        let next = response.next_id;
        let trigger = response.trigger.clone();
        if let Some(trigger) = trigger.filter(|t| !t.is_empty()) {
            if let Err(e) = self.triggers.handle(&trigger) {
                return Err(self.abort(e));
            }
        }

        self.show(next)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Make `target` the current sentence.
    ///
    /// A missing or soft-deleted target is a corrupt-graph condition and
    /// aborts the session. An End sentence tears the session down without
    /// firing triggers or entering the view. Otherwise: set current, fire
    /// the sentence's triggers in order, then notify the view.
    fn show(&mut self, target: NodeId) -> Result<(), DialogueError> {
        let Some(session) = &mut self.session else {
            return Ok(());
        };
        let dialogue = Arc::clone(&session.dialogue);

        let node = match dialogue.node(target) {
            Ok(node) if !node.deleted => node,
            _ => return Err(self.abort(DialogueError::InvalidReference(target))),
        };

        if node.sentence.variant == Variant::End {
            self.end_session();
            return Ok(());
        }

        if let Some(session) = &mut self.session {
            session.current = target;
        }

        for trigger in &node.sentence.triggers {
            if let Err(e) = self.triggers.handle(trigger) {
                return Err(self.abort(e));
            }
        }

        self.view.sentence_entered(&node.sentence);
        Ok(())
    }

    /// Clear the session and notify the view exactly once.
    fn end_session(&mut self) {
        if self.session.take().is_some() {
            self.view.session_ended();
        }
    }

    /// Fatal session error: clean teardown, then hand the error back.
    fn abort(&mut self, error: DialogueError) -> DialogueError {
        self.end_session();
        error
    }
}

// =============================================================================
// TESTS
// =============================================================================
