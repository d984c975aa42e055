//! # Persistence Format
//!
//! Binary serialization for dialogues.
//!
//! Format: Header (5 bytes) + postcard-serialized dialogue data.
//! - 4 bytes: Magic ("PRTL")
//! - 1 byte: Version
//!
//! The codec round-trips node ids, soft-delete flags, and response targets
//! exactly, which is what keeps index-based edges valid across save/load.
//!
//! ## Security
//!
//! Pre-deserialization validation guards against malicious files:
//! - Maximum payload size limit (`MAX_PERSISTENCE_PAYLOAD_SIZE`)
//! - Header validation before payload parsing
//! - Graceful error handling for corrupted data

use crate::{primitives, Dialogue, DialogueError};

/// Maximum allowed payload size for the persistence format.
///
/// Dialogues are authored assets; even sprawling ones stay far below this.
/// The limit is validated BEFORE attempting deserialization to prevent
/// allocation-based attacks.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 64 * 1024 * 1024; // 64 MB

/// Minimum valid file size (header only).
const MIN_FILE_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The persistence header precedes all dialogue data.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), DialogueError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(DialogueError::SerializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(DialogueError::SerializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DialogueError> {
        if bytes.len() < MIN_FILE_SIZE {
            return Err(DialogueError::SerializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a dialogue to bytes (header + payload).
///
/// This is a pure transformation - no file I/O.
pub fn dialogue_to_bytes(dialogue: &Dialogue) -> Result<Vec<u8>, DialogueError> {
    let header = PersistenceHeader::new();

    let payload = postcard::to_stdvec(dialogue)
        .map_err(|e| DialogueError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(5 + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a dialogue from bytes.
///
/// Validates minimum size, maximum size, and the header before touching
/// the payload.
pub fn dialogue_from_bytes(bytes: &[u8]) -> Result<Dialogue, DialogueError> {
    if bytes.len() < MIN_FILE_SIZE {
        return Err(DialogueError::SerializationError(
            "Data too short: minimum 5 bytes required".to_string(),
        ));
    }

    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(DialogueError::SerializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[5..];
    let dialogue: Dialogue = postcard::from_bytes(payload).map_err(|e| {
        DialogueError::SerializationError(format!("Failed to deserialize dialogue data: {}", e))
    })?;

    Ok(dialogue)
}

// =============================================================================
// TESTS
// =============================================================================
