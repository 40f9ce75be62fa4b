//! File Container
//!
//! Opens a container, walks its sector chain and assembles the dictionary.
//!
//! ## Responsibilities
//! - Validate the header block
//! - Follow `next` links from sector 1 (logical order, not physical)
//! - Thread one path stack across every sector boundary
//! - Reconstruct tables once the chain is done
//!
//! The stream is owned only while parsing; it is dropped on return,
//! whether the parse succeeded or failed.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use chrono::NaiveDate;

use crate::chunk::Chunk;
use crate::config::Config;
use crate::dict::{Assembler, AssemblyWarning, Dictionary};
use crate::error::{FmpError, Result};
use crate::sector::{read_sector, FileHeader, SECTOR_SIZE};
use crate::table::{reconstruct_tables, Table};

/// First sector of the chain
const FIRST_SECTOR_ID: u64 = 1;

/// A fully decoded container
#[derive(Debug, Clone)]
pub struct FmpFile {
    /// Header fields
    header: FileHeader,

    /// Total stream length in bytes
    file_size: u64,

    /// Sector count, header block excluded
    num_sectors: u64,

    /// Sectors visited by the chain walk
    sectors_walked: u64,

    /// Assembled dictionary
    dictionary: Dictionary,

    /// Decoded chunks in file order (only with `retain_chunks`)
    chunks: Vec<Chunk>,

    /// Anomalies tolerated while assembling
    warnings: Vec<AssemblyWarning>,

    /// Tables reconstructed from the dictionary
    tables: Vec<Table>,
}

impl FmpFile {
    /// Open a container file with the default config
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::open(BufReader::new(file))
    }

    /// Open a container from any seekable stream with the default config
    pub fn open<R: Read + Seek>(stream: R) -> Result<Self> {
        Self::open_with(stream, &Config::default())
    }

    /// Open a container from a seekable stream
    ///
    /// Steps:
    /// 1. Measure the stream and derive the sector count
    /// 2. Validate the header block
    /// 3. Walk the sector chain, applying every chunk
    /// 4. Reconstruct tables
    pub fn open_with<R: Read + Seek>(mut stream: R, config: &Config) -> Result<Self> {
        // Step 1: Sizes
        let file_size = stream.seek(SeekFrom::End(0))?;
        stream.seek(SeekFrom::Start(0))?;
        let num_sectors = (file_size / SECTOR_SIZE as u64).saturating_sub(1);

        // Step 2: Header block
        let header = FileHeader::read(&mut stream)?;
        tracing::debug!(
            "Header: application={:?} version={} size={} sectors={}",
            header.application_name,
            header.version_date,
            file_size,
            num_sectors
        );

        // Step 3: Chain walk
        let mut assembler = Assembler::new();
        let mut chunks = Vec::new();
        let mut sectors_walked = 0u64;
        let mut next = if num_sectors > 0 { FIRST_SECTOR_ID } else { 0 };

        while next != 0 {
            // At most one visit per sector; more means a cycle
            if sectors_walked >= num_sectors {
                return Err(FmpError::BadHeader(format!(
                    "sector chain longer than {} sectors",
                    num_sectors
                )));
            }

            let sector = read_sector(&mut stream, next, config.delayed_pop)?;
            sectors_walked += 1;

            tracing::debug!(
                "Sector {}: prev={} next={} chunks={} deleted={}",
                sector.id,
                sector.prev_id,
                sector.next_id,
                sector.chunks.len(),
                sector.deleted
            );

            for chunk in &sector.chunks {
                assembler.apply(chunk);
            }
            if config.retain_chunks {
                chunks.extend(sector.chunks.iter().cloned());
            }

            if sector.next_id > num_sectors {
                return Err(FmpError::BadHeader(format!(
                    "sector {} links to {} beyond {} sectors",
                    sector.id, sector.next_id, num_sectors
                )));
            }
            next = sector.next_id;
        }

        let chunks_applied = assembler.chunks_applied();
        let (dictionary, warnings) = assembler.finish();

        // Step 4: Tables
        let tables = reconstruct_tables(&dictionary, &config.table_root);

        tracing::info!(
            "Opened {} ({}): {} sectors walked, {} chunks, {} tables, {} warnings",
            header.application_name,
            header.version_date,
            sectors_walked,
            chunks_applied,
            tables.len(),
            warnings.len()
        );

        Ok(Self {
            header,
            file_size,
            num_sectors,
            sectors_walked,
            dictionary,
            chunks,
            warnings,
            tables,
        })
    }

    // =========================================================================
    // Header
    // =========================================================================

    /// Format version date from the header block
    pub fn version_date(&self) -> NaiveDate {
        self.header.version_date
    }

    /// Creator / application name from the header block
    pub fn application_name(&self) -> &str {
        &self.header.application_name
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    // =========================================================================
    // Sizes
    // =========================================================================

    /// Total stream length in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of sectors, header block excluded
    pub fn num_sectors(&self) -> u64 {
        self.num_sectors
    }

    /// Number of sectors the chain walk visited
    pub fn sectors_walked(&self) -> u64 {
        self.sectors_walked
    }

    // =========================================================================
    // Decoded Content
    // =========================================================================

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Chunks in file order; empty unless `retain_chunks` was set
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Anomalies tolerated during assembly
    pub fn warnings(&self) -> &[AssemblyWarning] {
        &self.warnings
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Mutable tables, for in-memory record creation
    pub fn tables_mut(&mut self) -> &mut [Table] {
        &mut self.tables
    }

    /// Table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Mutable table by name
    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }
}
