//! # Trigger Dispatch
//!
//! Triggers are plain string tokens attached to sentences (fired on entry)
//! and responses (fired at choice time). The engine never interprets them;
//! it hands each token, in order, to a [`TriggerHandler`] owned by the
//! host.
//!
//! A handler that returns an error aborts the running session, so handlers
//! are expected to log-and-ignore anything they don't understand rather
//! than fail.

use crate::DialogueError;

/// Receives trigger tokens from the player, one per call, in dispatch
/// order.
///
/// Implementations own their mini-syntax. Returning an error crosses the
/// fatal-error boundary: the player clears the session and surfaces the
/// error to its caller.
pub trait TriggerHandler {
    /// Handle a single trigger token.
    fn handle(&mut self, trigger: &str) -> Result<(), DialogueError>;
}

/// A handler that silently drops every trigger.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTriggerHandler;

impl TriggerHandler for NullTriggerHandler {
    fn handle(&mut self, _trigger: &str) -> Result<(), DialogueError> {
        Ok(())
    }
}

// =============================================================================
// BASIC `<key> <value>` HANDLER
// =============================================================================

/// A command recognized by [`BasicTriggerHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerCommand {
    /// Start a music track.
    Music(String),
    /// Play a one-shot sound.
    Sound(String),
}

/// Parse the `<key> <value>` trigger mini-syntax.
///
/// Recognized keys: `music`/`m` and `sound`/`s`. Anything else, including
/// empty or valueless tokens, yields `None`.
#[must_use]
pub fn parse_trigger(trigger: &str) -> Option<TriggerCommand> {
    let mut parts = trigger.split_whitespace();
    let key = parts.next()?;
    let value = parts.next()?;

    match key {
        "music" | "m" => Some(TriggerCommand::Music(value.to_string())),
        "sound" | "s" => Some(TriggerCommand::Sound(value.to_string())),
        _ => None,
    }
}

/// Reference trigger handler speaking the `<key> <value>` mini-syntax.
///
/// Recognized commands are journaled in dispatch order so the host (or a
/// test) can drain and act on them. Unrecognized tokens are logged to
/// stderr and ignored; this handler never returns an error.
#[derive(Debug, Clone, Default)]
pub struct BasicTriggerHandler {
    journal: Vec<TriggerCommand>,
}

impl BasicTriggerHandler {
    /// Create an empty handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands handled so far, in dispatch order.
    #[must_use]
    pub fn journal(&self) -> &[TriggerCommand] {
        &self.journal
    }

    /// Take the journal, leaving the handler empty.
    pub fn drain(&mut self) -> Vec<TriggerCommand> {
        std::mem::take(&mut self.journal)
    }
}

impl TriggerHandler for BasicTriggerHandler {
    fn handle(&mut self, trigger: &str) -> Result<(), DialogueError> {
        match parse_trigger(trigger) {
            Some(command) => self.journal.push(command),
            None => {
                // Log-and-ignore; unknown triggers must not kill the session.
                eprintln!(
                    "{{\"level\":\"warn\",\"target\":\"prattle_core::trigger\",\"message\":\"unrecognized trigger '{}'\"}}",
                    trigger
                );
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
