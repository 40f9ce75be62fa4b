//! Sector Module
//!
//! The container is a sequence of fixed 4096-byte blocks. Block 0 is the
//! file header; every other block is a sector linked to its neighbours by
//! logical prev/next ids, independent of physical order.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header Block (4096 bytes, sector 0)                     │
//! │   Magic (15) | "HBAM7" (5) | ...                        │
//! │   @531 Version date "YYMMMDD" (7)                       │
//! │   @541 Name length (1) | @542 Application name          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Sector N (4096 bytes)                                   │
//! │   Deleted (1) | Level (1) | -- (2) |                    │
//! │   PrevId: u32 BE (4) | NextId: u32 BE (4) | -- (8)      │
//! │   Payload (4076): chunk, chunk, ..., [00 00]            │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod header;
mod reader;

use bytes::Bytes;

use crate::chunk::Chunk;

pub use header::FileHeader;
pub use reader::{decode_payload, read_sector};

// =============================================================================
// Shared Constants (used by header, reader, file)
// =============================================================================

/// Size of every block in the file
pub const SECTOR_SIZE: usize = 4096;

/// Per-sector header: deleted (1) + level (1) + pad (2) + prev (4) + next (4) + pad (8)
pub const SECTOR_HEADER_SIZE: usize = 20;

/// Payload bytes following each sector header
pub const PAYLOAD_SIZE: usize = SECTOR_SIZE - SECTOR_HEADER_SIZE;

/// Logical id of the fixed-format header block
pub const HEADER_SECTOR_ID: u64 = 0;

// =============================================================================
// Sector
// =============================================================================

/// One decoded sector
#[derive(Debug, Clone)]
pub struct Sector {
    /// Zero-based logical index (block position in the file)
    pub id: u64,

    /// Deletion flag from the sector header
    pub deleted: bool,

    /// Tree balance level, opaque to the decoder
    pub level: u8,

    /// Logical previous sector
    pub prev_id: u64,

    /// Logical next sector, 0 at the end of the chain
    pub next_id: u64,

    /// Raw payload bytes
    pub payload: Bytes,

    /// Chunks decoded from the payload, in order
    pub chunks: Vec<Chunk>,
}

impl Sector {
    /// Whether this is the fixed-format file header block
    pub fn is_header(&self) -> bool {
        self.id == HEADER_SECTOR_ID
    }

    /// Whether the chain ends at this sector
    pub fn is_last(&self) -> bool {
        self.next_id == 0
    }
}
