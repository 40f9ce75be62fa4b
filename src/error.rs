//! Error types for fmp12
//!
//! Provides a unified error type for all decode operations. Every variant
//! aborts the current parse: a single misdecoded chunk shifts every offset
//! that follows it, so there is no partial-file recovery.

use thiserror::Error;

/// Result type alias using FmpError
pub type Result<T> = std::result::Result<T, FmpError>;

/// Unified error type for fmp12 operations
#[derive(Debug, Error)]
pub enum FmpError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Header Errors
    // -------------------------------------------------------------------------
    #[error("bad magic number")]
    BadMagic,

    #[error("bad header: {0}")]
    BadHeader(String),

    #[error("bad sector header: sector {id} has prev id {prev_id}")]
    BadSectorHeader { id: u64, prev_id: u64 },

    // -------------------------------------------------------------------------
    // Chunk Errors
    // -------------------------------------------------------------------------
    #[error("bad chunk 0x{opcode:02x}: {reason}")]
    BadChunk { opcode: u8, reason: String },

    // -------------------------------------------------------------------------
    // Text Errors
    // -------------------------------------------------------------------------
    #[error("unsupported character set: {0}")]
    UnsupportedCharset(String),

    // -------------------------------------------------------------------------
    // Table Errors
    // -------------------------------------------------------------------------
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("no record index left in table {table}: largest in use is {last}")]
    RecordIndexExhausted { table: String, last: u64 },
}

impl FmpError {
    /// Create a bad chunk error for the given opcode
    pub fn bad_chunk(opcode: u8, reason: impl Into<String>) -> Self {
        Self::BadChunk {
            opcode,
            reason: reason.into(),
        }
    }
}
