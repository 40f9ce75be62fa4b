//! Chunk Module
//!
//! A chunk is one opcode-tagged, variable-length unit inside a sector
//! payload. Chunks either move the current dictionary path (push/pop) or
//! write a value at it.
//!
//! ## Chunk Layout
//! ```text
//! ┌───────────┬──────────────────────┬──────────────┬─────────────────┐
//! │ Opcode(1) │ Key / Index (0..n)   │ Length (0..3)│      Value      │
//! └───────────┴──────────────────────┴──────────────┴─────────────────┘
//! ```
//!
//! ### Categories
//! - simple data:      value written at the current path
//! - segmented data:   value appended at the current path
//! - simple key-value: value written at current path + 1-2 byte key
//! - long key-value:   value written at current path + 3+ byte key
//! - path push:        1-3 byte path segment appended to the path stack
//! - path push long:   up to 8 byte path segment appended to the path stack
//! - path pop:         last path segment removed
//! - no-op

mod decoder;

use std::fmt;

use bytes::Bytes;

use crate::encoding::decode_varuint;

pub use decoder::{decode_chunk, DELAYED_MASK};

/// Discriminated chunk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkType {
    SimpleData,
    SegmentedData,
    SimpleKeyValue,
    LongKeyValue,
    PathPush,
    PathPushLong,
    PathPop,
    Noop,
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChunkType::SimpleData => "SimpleData",
            ChunkType::SegmentedData => "SegmentedData",
            ChunkType::SimpleKeyValue => "SimpleKeyValue",
            ChunkType::LongKeyValue => "LongKeyValue",
            ChunkType::PathPush => "PathPush",
            ChunkType::PathPushLong => "PathPushLong",
            ChunkType::PathPop => "PathPop",
            ChunkType::Noop => "Noop",
        };
        f.write_str(name)
    }
}

/// A single decoded chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Opcode byte exactly as it appeared in the payload
    pub opcode: u8,

    /// Category the opcode decoded to
    pub chunk_type: ChunkType,

    /// Total bytes consumed, opcode included (always >= 1)
    pub length: usize,

    /// Key for key-value chunks
    pub key: Option<u64>,

    /// Segment index for segmented data
    pub index: Option<u64>,

    /// Value slice (empty for pops and no-ops)
    pub value: Bytes,

    /// Set when the delayed-pop modifier was present on the opcode
    pub delayed: bool,
}

impl Chunk {
    /// Path segment carried by a push chunk
    pub fn path_segment(&self) -> Option<u64> {
        match self.chunk_type {
            ChunkType::PathPush | ChunkType::PathPushLong => Some(decode_varuint(&self.value)),
            _ => None,
        }
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}({})>", self.chunk_type, self.length)
    }
}
