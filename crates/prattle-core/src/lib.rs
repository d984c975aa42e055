//! # prattle-core
//!
//! The dialogue graph engine for Prattle - THE LOGIC.
//!
//! This crate implements the CORE substrate - a compact, deterministic
//! graph of spoken sentences and the responses that connect them, plus a
//! player that walks the graph one sentence at a time.
//!
//! ## Layout
//!
//! - `types` - sentences, responses, actors, and the shared error type
//! - `graph` / `mutation` - the node arena and its editing operations
//! - `player` / `trigger` - the playback state machine and its collaborators
//! - `formats` - byte-level persistence
//! - `validate` - eager whole-graph structural checks
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is the ONLY place where dialogue state exists (stateful)
//! - Is closed: hosts integrate through the `SentenceView` and
//!   `TriggerHandler` seams, never by injecting logic
//! - Never initiates interaction; only reacts to explicit calls
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod formats;
pub mod graph;
pub mod mutation;
pub mod player;
pub mod primitives;
pub mod trigger;
pub mod types;
pub mod validate;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Actor, DialogueError, Expression, Node, NodeId, Response, Sentence, Variant};

// =============================================================================
// RE-EXPORTS: Graph Engine
// =============================================================================

pub use graph::Dialogue;
pub use player::{DialoguePlayer, NullView, SentenceView, SessionState};
pub use trigger::{
    BasicTriggerHandler, NullTriggerHandler, TriggerCommand, TriggerHandler, parse_trigger,
};
pub use validate::{ValidationIssue, validate};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{PersistenceHeader, dialogue_from_bytes, dialogue_to_bytes};
