//! Shared fixture helpers
//!
//! Builds synthetic containers: a valid header block followed by chained
//! sectors whose payloads are assembled chunk by chunk.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use fmp12::encoding::encode_string;
use tempfile::TempDir;

pub const SECTOR_SIZE: usize = 4096;
pub const PAYLOAD_SIZE: usize = 4076;

pub const MAGIC: &[u8; 15] = b"\x00\x01\x00\x00\x00\x02\x00\x01\x00\x05\x00\x02\x00\x02\xC0";
pub const FORMAT_TAG: &[u8; 5] = b"HBAM7";

pub const PRIMARY_KEY_VALUE: &str = "629FAA83-50D8-401F-A560-C8D45217D17B";

// =============================================================================
// Block Builders
// =============================================================================

/// Header block with the given `YYMMMDD` date and application name
pub fn header_block(date: &str, app_name: &str) -> Vec<u8> {
    let mut block = vec![0u8; SECTOR_SIZE];
    block[..15].copy_from_slice(MAGIC);
    block[15..20].copy_from_slice(FORMAT_TAG);
    block[531..531 + date.len()].copy_from_slice(date.as_bytes());
    block[541] = app_name.len() as u8;
    block[542..542 + app_name.len()].copy_from_slice(app_name.as_bytes());
    block
}

/// Sector block: 20-byte header then the payload, zero padded
pub fn sector_block(prev: u32, next: u32, payload: &[u8]) -> Vec<u8> {
    assert!(payload.len() <= PAYLOAD_SIZE, "payload too large for one sector");
    let mut block = vec![0u8; SECTOR_SIZE];
    block[4..8].copy_from_slice(&prev.to_be_bytes());
    block[8..12].copy_from_slice(&next.to_be_bytes());
    block[20..20 + payload.len()].copy_from_slice(payload);
    block
}

// =============================================================================
// Chunk Writer
// =============================================================================

/// Encodes chunks into a payload
#[derive(Default)]
pub struct Chunks {
    bytes: Vec<u8>,
}

impl Chunks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, segment: u64) -> Self {
        if segment < 0x100 && segment != 0xFE {
            self.bytes.extend_from_slice(&[0x20, segment as u8]);
        } else if segment < 0x1_0000 {
            self.bytes.push(0x28);
            self.bytes.extend_from_slice(&(segment as u16).to_be_bytes());
        } else if segment < 0x100_0000 {
            self.bytes.push(0x30);
            self.bytes.extend_from_slice(&(segment as u32).to_be_bytes()[1..]);
        } else {
            self.bytes.extend_from_slice(&[0x38, 8]);
            self.bytes.extend_from_slice(&segment.to_be_bytes());
        }
        self
    }

    pub fn path(mut self, segments: &[u64]) -> Self {
        for segment in segments {
            self = self.push(*segment);
        }
        self
    }

    pub fn pop(mut self) -> Self {
        self.bytes.push(0x40);
        self
    }

    pub fn pops(mut self, count: usize) -> Self {
        for _ in 0..count {
            self = self.pop();
        }
        self
    }

    /// Key-value chunk (0x06 when it fits, 0x17 otherwise)
    pub fn kv(mut self, key: u64, value: &[u8]) -> Self {
        if key < 0x100 && value.len() < 0x100 {
            self.bytes.extend_from_slice(&[0x06, key as u8, value.len() as u8]);
        } else {
            self.bytes.push(0x17);
            self.bytes.extend_from_slice(&(key as u32).to_be_bytes()[1..]);
            self.bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        }
        self.bytes.extend_from_slice(value);
        self
    }

    /// Key-value chunk holding an XOR-encoded string
    pub fn text(self, key: u64, text: &str) -> Self {
        self.kv(key, &encode_string(text))
    }

    /// Simple data chunk (0x19: length byte, value, one trailing byte)
    pub fn data(mut self, value: &[u8]) -> Self {
        self.bytes.extend_from_slice(&[0x19, value.len() as u8]);
        self.bytes.extend_from_slice(value);
        self.bytes.push(0x00);
        self
    }

    /// Segmented data chunk (0x07)
    pub fn segment(mut self, index: u8, value: &[u8]) -> Self {
        self.bytes.extend_from_slice(&[0x07, index]);
        self.bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(value);
        self
    }

    pub fn noop(mut self) -> Self {
        self.bytes.push(0x80);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

// =============================================================================
// Container Builder
// =============================================================================

/// Lays out a header block and sectors at chosen block positions
pub struct Container {
    date: String,
    app_name: String,
    /// (block id, prev, next, payload)
    sectors: Vec<(usize, u32, u32, Vec<u8>)>,
    blocks: usize,
}

impl Container {
    pub fn new(date: &str, app_name: &str) -> Self {
        Self {
            date: date.to_string(),
            app_name: app_name.to_string(),
            sectors: Vec::new(),
            blocks: 1,
        }
    }

    /// Place a sector at block `id`
    pub fn sector(mut self, id: usize, prev: u32, next: u32, payload: Vec<u8>) -> Self {
        self.blocks = self.blocks.max(id + 1);
        self.sectors.push((id, prev, next, payload));
        self
    }

    /// Pad the file to at least `count` blocks (header included)
    pub fn blocks(mut self, count: usize) -> Self {
        self.blocks = self.blocks.max(count);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut file = vec![0u8; self.blocks * SECTOR_SIZE];
        file[..SECTOR_SIZE].copy_from_slice(&header_block(&self.date, &self.app_name));
        for (id, prev, next, payload) in &self.sectors {
            let start = id * SECTOR_SIZE;
            file[start..start + SECTOR_SIZE].copy_from_slice(&sector_block(*prev, *next, payload));
        }
        file
    }

    /// Write to a temp file; keep the TempDir alive while the path is used
    pub fn write_temp(self) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fixture.fmp12");
        fs::write(&path, self.build()).unwrap();
        (temp_dir, path)
    }
}

// =============================================================================
// Canned Fixtures
// =============================================================================

/// Column flag string
pub fn column_flags(kind: u8, data_type: u8, storage: u8, options: u8, preset: u8, reps: u8, indexed: bool) -> Vec<u8> {
    let mut flags = vec![0u8; 26];
    flags[0] = kind;
    flags[1] = data_type;
    flags[4] = preset;
    flags[8] = if indexed { 0x80 } else { 0 };
    flags[9] = storage;
    flags[11] = options;
    flags[25] = reps;
    flags
}

/// One table "Untitled" (id 129), two columns, three records, spread over
/// three sectors chained 1 → 3 → 2 with paths left open across boundaries.
pub fn untitled() -> Container {
    let primary_key = column_flags(1, 1, 0, 136, 0, 1, true);
    let created_at = column_flags(1, 5, 0, 0x01, 2, 1, false);

    let first = Chunks::new()
        .path(&[3, 16, 5, 129])
        .text(16, "Untitled")
        .pops(4)
        .path(&[129, 3, 5, 1])
        .text(16, "PrimaryKey")
        .build();

    let second = Chunks::new()
        .kv(2, &primary_key)
        .pop()
        .push(2)
        .text(16, "CreatedAt")
        .kv(2, &created_at)
        .pops(4)
        .path(&[129, 5, 1])
        .text(1, PRIMARY_KEY_VALUE)
        .text(2, "1/11/2025 10:00:00")
        .pop()
        .push(2)
        .text(1, "8C5B1F0E-0E7C-4B43-9D0A-6F3C2A1B9E44")
        .pop()
        .build();

    let third = Chunks::new()
        .push(3)
        .text(1, "0D7E3A55-1F2B-4C6D-8E9F-A0B1C2D3E4F5")
        .pops(3)
        .build();

    Container::new("25JAN11", "Pro 12.0")
        .sector(1, 0, 3, first)
        .sector(3, 1, 2, second)
        .sector(2, 3, 0, third)
}
