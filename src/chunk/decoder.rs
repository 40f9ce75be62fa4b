//! Chunk decoder
//!
//! Turns the remaining bytes of a sector payload into exactly one chunk.
//!
//! Every opcode maps to a [`Layout`]: the chunk type, its total length, an
//! optional key or segment index, and the value range. Layout fields are read
//! through a bounds-checked [`Window`], so a length field pointing past the
//! payload is reported as `BadChunk` instead of panicking. The decoder never
//! reads past the supplied window.

use std::ops::Range;

use bytes::Bytes;

use crate::encoding::decode_varuint;
use crate::error::{FmpError, Result};

use super::{Chunk, ChunkType};

/// Opcode bits marking a delayed chunk (when the modifier is enabled)
pub const DELAYED_MASK: u8 = 0xC0;

/// Second-byte marker selecting the 8-byte form of a path push
const LONG_PUSH_MARKER: u8 = 0xFE;

/// Second-byte marker selecting the 5-byte simple data form of 0x0E
const SHORT_DATA_MARKER: u8 = 0xFF;

/// Decode one chunk from the start of `payload`
///
/// With `delayed_pop` set, opcodes carrying both [`DELAYED_MASK`] bits are
/// decoded from their low six bits and flagged as delayed.
pub fn decode_chunk(payload: &Bytes, delayed_pop: bool) -> Result<Chunk> {
    let Some(&raw) = payload.first() else {
        return Err(FmpError::bad_chunk(0, "empty payload window"));
    };

    let (opcode, delayed) = if delayed_pop && raw & DELAYED_MASK == DELAYED_MASK {
        (raw & !DELAYED_MASK, true)
    } else {
        (raw, false)
    };

    let window = Window { raw, bytes: payload };
    let layout = layout(opcode, &window)?;

    if layout.length == 0 || layout.length > payload.len() {
        return Err(FmpError::bad_chunk(
            raw,
            format!(
                "length {} overruns window of {} bytes",
                layout.length,
                payload.len()
            ),
        ));
    }
    if layout.value.start > layout.value.end || layout.value.end > layout.length {
        return Err(FmpError::bad_chunk(
            raw,
            format!(
                "value {:?} outside chunk of {} bytes",
                layout.value, layout.length
            ),
        ));
    }

    Ok(Chunk {
        opcode: raw,
        chunk_type: layout.chunk_type,
        length: layout.length,
        key: layout.key,
        index: layout.index,
        value: payload.slice(layout.value),
        delayed,
    })
}

// =============================================================================
// Layout Table
// =============================================================================

/// Where a chunk's parts sit inside the window
struct Layout {
    chunk_type: ChunkType,
    length: usize,
    key: Option<u64>,
    index: Option<u64>,
    value: Range<usize>,
}

impl Layout {
    fn data(length: usize, value: Range<usize>) -> Self {
        Self::bare(ChunkType::SimpleData, length, value)
    }

    fn keyed(chunk_type: ChunkType, key: u64, length: usize, value_start: usize) -> Self {
        Self {
            key: Some(key),
            ..Self::bare(chunk_type, length, value_start..length)
        }
    }

    fn segment(index: u64, length: usize, value_start: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::bare(ChunkType::SegmentedData, length, value_start..length)
        }
    }

    fn bare(chunk_type: ChunkType, length: usize, value: Range<usize>) -> Self {
        Self {
            chunk_type,
            length,
            key: None,
            index: None,
            value,
        }
    }
}

fn layout(opcode: u8, w: &Window<'_>) -> Result<Layout> {
    use ChunkType::*;

    let op = usize::from(opcode);

    let layout = match opcode {
        0x00 => Layout::data(2, 1..2),
        0x01 => Layout::keyed(SimpleKeyValue, w.key8(1)?, 3, 2),
        0x02..=0x05 => Layout::keyed(SimpleKeyValue, w.key8(1)?, 2 + 2 * (op - 0x01), 2),
        0x06 => Layout::keyed(SimpleKeyValue, w.key8(1)?, 3 + w.len8(2)?, 3),
        0x07 => {
            // Segments may straddle the sector boundary: clamp to what is here
            let length = (4 + w.varlen(2..4)?).min(w.len());
            Layout::segment(w.key8(1)?, length, 4)
        }
        0x08 => Layout::data(3, 1..3),
        0x09 => Layout::keyed(SimpleKeyValue, w.varuint(1..3)?, 4, 3),
        0x0A..=0x0D => Layout::keyed(SimpleKeyValue, w.varuint(1..3)?, 3 + 2 * (op - 0x09), 3),
        0x0E if w.byte(1)? == SHORT_DATA_MARKER => Layout::data(7, 2..7),
        0x0E => Layout::keyed(SimpleKeyValue, w.varuint(1..3)?, 4 + w.len8(3)?, 4),
        0x0F => Layout::segment(w.varuint(1..3)?, 5 + w.varlen(3..5)?, 5),
        0x10 | 0x11 => {
            let length = 4 + op - 0x10;
            Layout::data(length, 1..length)
        }
        0x12..=0x15 => {
            let length = 4 + 2 * (op - 0x11);
            Layout::data(length, 1..length)
        }
        0x16 => Layout::keyed(LongKeyValue, w.varuint(1..4)?, 5 + w.len8(4)?, 5),
        0x17 => Layout::keyed(LongKeyValue, w.varuint(1..4)?, 6 + w.varlen(4..6)?, 6),
        0x19..=0x1D => {
            let size = w.len8(1)?;
            let extra = if opcode == 0x19 { 1 } else { 0 };
            Layout::data(2 + size + 2 * (op - 0x19) + extra, 2..2 + size)
        }
        0x1E => {
            let key_len = w.len8(1)?;
            let key = w.varuint(2..2 + key_len)?;
            let value_len = w.len8(2 + key_len)?;
            Layout::keyed(LongKeyValue, key, 2 + key_len + 1 + value_len, 2 + key_len + 1)
        }
        0x1F => {
            let key_len = w.len8(1)?;
            let key = w.varuint(2..2 + key_len)?;
            let value_len = w.varlen(2 + key_len..2 + key_len + 3)?;
            Layout::keyed(LongKeyValue, key, 2 + key_len + 2 + value_len, 2 + key_len + 2)
        }
        0x20 | 0xE0 if w.byte(1)? == LONG_PUSH_MARKER => Layout::bare(PathPushLong, 10, 2..10),
        0x20 | 0xE0 => Layout::bare(PathPush, 2, 1..2),
        0x23 => {
            let length = 2 + w.len8(1)?;
            Layout::data(length, 1..length)
        }
        0x28 => Layout::bare(PathPush, 3, 1..3),
        0x30 => Layout::bare(PathPush, 4, 1..4),
        0x38 => {
            let length = 2 + w.len8(1)?;
            Layout::bare(PathPushLong, length, 2..length)
        }
        0x3D | 0x40 => Layout::bare(PathPop, 1, 1..1),
        0x80 => Layout::bare(Noop, 1, 1..1),
        _ => return Err(FmpError::bad_chunk(w.raw, "unknown opcode")),
    };

    Ok(layout)
}

// =============================================================================
// Bounds-checked Window
// =============================================================================

/// Read-only view of the remaining payload
struct Window<'a> {
    /// Opcode byte as seen in the payload, for error reporting
    raw: u8,
    bytes: &'a [u8],
}

impl Window<'_> {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn byte(&self, at: usize) -> Result<u8> {
        self.bytes.get(at).copied().ok_or_else(|| {
            FmpError::bad_chunk(
                self.raw,
                format!("needs byte {} of a {} byte window", at, self.len()),
            )
        })
    }

    /// One byte used as a key or index
    fn key8(&self, at: usize) -> Result<u64> {
        self.byte(at).map(u64::from)
    }

    /// One byte used as a length
    fn len8(&self, at: usize) -> Result<usize> {
        self.byte(at).map(usize::from)
    }

    fn varuint(&self, range: Range<usize>) -> Result<u64> {
        match self.bytes.get(range.clone()) {
            Some(bytes) => Ok(decode_varuint(bytes)),
            None => Err(FmpError::bad_chunk(
                self.raw,
                format!("needs bytes {:?} of a {} byte window", range, self.len()),
            )),
        }
    }

    /// Multi-byte big-endian length field
    fn varlen(&self, range: Range<usize>) -> Result<usize> {
        let value = self.varuint(range)?;
        usize::try_from(value)
            .map_err(|_| FmpError::bad_chunk(self.raw, format!("length {} too large", value)))
    }
}
