//! # Engine Primitives
//!
//! Hardcoded runtime constants for the Prattle engine.
//!
//! These limits are compiled into the binary and are immutable at runtime.
//! They bound every authoring mutation so that a dialogue stays cheap to
//! serialize, validate, and walk.

/// Magic bytes for the Prattle binary format header.
///
/// - File Header = Magic Bytes ("PRTL") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"PRTL";

/// Current serialization format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const FORMAT_VERSION: u8 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for sentence and response text.
///
/// Longer text is rejected by the authoring mutations.
/// This prevents memory exhaustion from malformed input files.
pub const MAX_TEXT_LENGTH: usize = 65536;

/// Maximum length for a single trigger token.
pub const MAX_TRIGGER_LENGTH: usize = 256;

/// Maximum number of triggers on a single sentence.
pub const MAX_TRIGGERS_PER_SENTENCE: usize = 64;

/// Maximum number of responses on a single sentence.
///
/// The display order of responses is their insertion order; a list this
/// long is already unusable in any host UI.
pub const MAX_RESPONSES_PER_SENTENCE: usize = 64;

/// Maximum number of node slots in a single dialogue.
///
/// Counts soft-deleted slots too, since they occupy arena positions.
pub const MAX_NODES: usize = 100_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(MAGIC_BYTES, b"PRTL");
    }

    #[test]
    fn limits_are_sane() {
        assert!(MAX_RESPONSES_PER_SENTENCE <= MAX_NODES);
        assert!(MAX_TRIGGER_LENGTH <= MAX_TEXT_LENGTH);
    }
}
