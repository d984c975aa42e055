//! # Serialization Formats
//!
//! Byte-level codecs for dialogues. Pure transformations only; file I/O
//! belongs to the app layer.

mod persistence;

pub use persistence::{
    dialogue_from_bytes, dialogue_to_bytes, PersistenceHeader, MAX_PERSISTENCE_PAYLOAD_SIZE,
};
