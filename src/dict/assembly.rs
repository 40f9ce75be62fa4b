//! Dictionary assembly
//!
//! Applies decoded chunks, in file order, to a dictionary while threading the
//! path stack across chunks and sectors.

use std::fmt;

use crate::chunk::{Chunk, ChunkType};

use super::Dictionary;

/// Current dictionary coordinate while decoding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathStack {
    segments: Vec<u64>,
}

impl PathStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: u64) {
        self.segments.push(segment);
    }

    /// Remove the last segment; `None` if the stack was already empty
    pub fn pop(&mut self) -> Option<u64> {
        self.segments.pop()
    }

    /// Current path, outermost segment first
    pub fn as_slice(&self) -> &[u64] {
        &self.segments
    }

    /// Current path extended by one key
    pub fn with_key(&self, key: u64) -> Vec<u64> {
        let mut path = Vec::with_capacity(self.segments.len() + 1);
        path.extend_from_slice(&self.segments);
        path.push(key);
        path
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<Vec<u64>> for PathStack {
    fn from(segments: Vec<u64>) -> Self {
        Self { segments }
    }
}

/// Anomaly tolerated during assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyWarning {
    /// A pop (explicit or delayed) found the path stack empty
    PopOnEmptyPath { opcode: u8, delayed: bool },
}

impl fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyWarning::PopOnEmptyPath { opcode, delayed: false } => {
                write!(f, "path pop 0x{:02x} on empty path", opcode)
            }
            AssemblyWarning::PopOnEmptyPath { opcode, delayed: true } => {
                write!(f, "delayed pop after 0x{:02x} on empty path", opcode)
            }
        }
    }
}

/// Apply one chunk to the dictionary and path stack
///
/// Returns the anomalies the chunk caused; they are logged, never fatal.
pub fn apply(dict: &mut Dictionary, path: &mut PathStack, chunk: &Chunk) -> Vec<AssemblyWarning> {
    let mut warnings = Vec::new();

    match chunk.chunk_type {
        ChunkType::PathPush | ChunkType::PathPushLong => {
            if let Some(segment) = chunk.path_segment() {
                path.push(segment);
            }
        }
        ChunkType::PathPop => {
            if path.pop().is_none() {
                warnings.push(AssemblyWarning::PopOnEmptyPath {
                    opcode: chunk.opcode,
                    delayed: false,
                });
            }
        }
        ChunkType::SimpleData => {
            dict.set_value(path.as_slice(), chunk.value.clone());
        }
        ChunkType::SegmentedData => {
            // Segments are appended in arrival order; the index is not used
            dict.append_value(path.as_slice(), &chunk.value);
        }
        ChunkType::SimpleKeyValue | ChunkType::LongKeyValue => {
            if let Some(key) = chunk.key {
                dict.set_value(&path.with_key(key), chunk.value.clone());
            }
        }
        ChunkType::Noop => {}
    }

    if chunk.delayed && path.pop().is_none() {
        warnings.push(AssemblyWarning::PopOnEmptyPath {
            opcode: chunk.opcode,
            delayed: true,
        });
    }

    for warning in &warnings {
        tracing::warn!("Ignoring anomaly: {}", warning);
    }

    warnings
}

/// Owns the transient parse state for one file: dictionary, path stack, warnings
#[derive(Debug, Default)]
pub struct Assembler {
    dict: Dictionary,
    path: PathStack,
    warnings: Vec<AssemblyWarning>,
    chunks_applied: usize,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a chunk, collecting any warnings
    pub fn apply(&mut self, chunk: &Chunk) {
        let warnings = apply(&mut self.dict, &mut self.path, chunk);
        self.warnings.extend(warnings);
        self.chunks_applied += 1;
    }

    /// Current path stack
    pub fn path(&self) -> &PathStack {
        &self.path
    }

    /// Warnings collected so far
    pub fn warnings(&self) -> &[AssemblyWarning] {
        &self.warnings
    }

    pub fn chunks_applied(&self) -> usize {
        self.chunks_applied
    }

    /// Finish assembly, keeping the dictionary and warnings
    pub fn finish(self) -> (Dictionary, Vec<AssemblyWarning>) {
        (self.dict, self.warnings)
    }
}
