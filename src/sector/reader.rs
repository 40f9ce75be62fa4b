//! Sector Reader
//!
//! Reads one fixed-size block by logical id and decodes its payload into chunks.

use std::io::{Read, Seek, SeekFrom};

use bytes::Bytes;

use crate::chunk::{decode_chunk, Chunk};
use crate::encoding::decode_varuint;
use crate::error::{FmpError, Result};

use super::{Sector, PAYLOAD_SIZE, SECTOR_HEADER_SIZE, SECTOR_SIZE};

/// Read sector `id` from the stream
///
/// The header block (`id == 0`) must have a zero prev id and is returned
/// without chunks; every other sector has its payload decoded until the
/// payload runs out or a zero terminator is reached.
pub fn read_sector<R: Read + Seek>(stream: &mut R, id: u64, delayed_pop: bool) -> Result<Sector> {
    let offset = id
        .checked_mul(SECTOR_SIZE as u64)
        .ok_or_else(|| FmpError::BadHeader(format!("sector id {} out of range", id)))?;
    stream.seek(SeekFrom::Start(offset))?;

    // Read header first
    let mut header = [0u8; SECTOR_HEADER_SIZE];
    stream.read_exact(&mut header)?;

    let deleted = header[0] != 0;
    let level = header[1];
    let prev_id = decode_varuint(&header[4..8]);
    let next_id = decode_varuint(&header[8..12]);

    if id == 0 && prev_id != 0 {
        return Err(FmpError::BadSectorHeader { id, prev_id });
    }

    // Read payload
    let mut payload = vec![0u8; PAYLOAD_SIZE];
    stream.read_exact(&mut payload)?;
    let payload = Bytes::from(payload);

    let chunks = if id == 0 {
        Vec::new()
    } else {
        decode_payload(&payload, delayed_pop).map_err(|e| {
            tracing::warn!("Sector {} failed to decode: {}", id, e);
            e
        })?
    };

    tracing::trace!(
        "Sector {}: prev={} next={} deleted={} level={} chunks={}",
        id,
        prev_id,
        next_id,
        deleted,
        level,
        chunks.len()
    );

    Ok(Sector {
        id,
        deleted,
        level,
        prev_id,
        next_id,
        payload,
        chunks,
    })
}

/// Decode every chunk in a payload
///
/// Stops at the end of the payload, at a `00 00` terminator, or at a single
/// trailing zero byte. Decoder errors are returned as-is.
pub fn decode_payload(payload: &Bytes, delayed_pop: bool) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < payload.len() {
        let rest = &payload[pos..];
        if rest[0] == 0x00 && rest.get(1).map_or(true, |&b| b == 0x00) {
            break;
        }

        let chunk = decode_chunk(&payload.slice(pos..), delayed_pop).map_err(|e| {
            tracing::debug!("Chunk at offset {} failed to decode: {}", pos, e);
            e
        })?;
        tracing::trace!(
            "Chunk at {}: opcode=0x{:02x} {}",
            pos,
            chunk.opcode,
            chunk
        );

        pos += chunk.length;
        chunks.push(chunk);
    }

    Ok(chunks)
}
