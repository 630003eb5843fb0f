//! Error types for retinue
//!
//! TigerStyle: Explicit error types with context, using thiserror.
//!
//! Validation and not-found failures are returned as values by every core
//! operation; `Err` crossing a crate boundary means a gateway fault, a
//! serialization fault, or a programming error.

use thiserror::Error;

/// Result type alias for retinue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Retinue error types
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid entity ID: {id:?}, reason: {reason}")]
    InvalidEntityId { id: String, reason: String },

    #[error("Entity ID too long: {length} bytes exceeds limit of {limit} bytes")]
    EntityIdTooLong { length: usize, limit: usize },

    // =========================================================================
    // Registry Errors
    // =========================================================================
    #[error("Group member not found: {target}")]
    MemberNotFound { target: String },

    #[error("Note text {needle:?} not found in notes for {target}")]
    NoteMatchNotFound { target: String, needle: String },

    // =========================================================================
    // Block Store Errors
    //
    // Read/write faults are reported by gateway implementations talking to
    // a real memory service; the in-memory store cannot produce them.
    // =========================================================================
    #[error("Block read failed: {label}, reason: {reason}")]
    BlockReadFailed { label: String, reason: String },

    #[error("Block write failed: {label}, reason: {reason}")]
    BlockWriteFailed { label: String, reason: String },

    #[error("Block write conflict: {label}, expected version {expected}, found {actual}")]
    BlockWriteConflict {
        label: String,
        expected: u64,
        actual: u64,
    },

    #[error("Block shape invalid: {label}, reason: {reason}")]
    BlockShapeInvalid { label: String, reason: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Serialization failed: {reason}")]
    SerializationFailed { reason: String },

    #[error("Deserialization failed: {reason}")]
    DeserializationFailed { reason: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a member not found error
    pub fn member_not_found(target: impl Into<String>) -> Self {
        Self::MemberNotFound {
            target: target.into(),
        }
    }

    /// Create a note match not found error
    pub fn note_match_not_found(target: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::NoteMatchNotFound {
            target: target.into(),
            needle: needle.into(),
        }
    }

    /// Create a block read failed error
    pub fn block_read_failed(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BlockReadFailed {
            label: label.into(),
            reason: reason.into(),
        }
    }

    /// Create a block write failed error
    pub fn block_write_failed(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BlockWriteFailed {
            label: label.into(),
            reason: reason.into(),
        }
    }

    /// Create a block shape invalid error
    pub fn block_shape_invalid(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BlockShapeInvalid {
            label: label.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Check if this error is retriable
    ///
    /// Write conflicts are transient: a re-read picks up the winning
    /// snapshot and the mutation can be replayed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::BlockWriteConflict { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationFailed {
            reason: err.to_string(),
        }
    }
}
