//! # fmp12
//!
//! A decoder for sector-chained `.fmp12` database containers:
//! - Sector chain walking in logical (linked) order
//! - Variable-length chunk decoding
//! - Path-stack driven dictionary assembly
//! - Table / column / record reconstruction
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      File Container                          │
//! │          (header block, chain walk, path stack)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ next_id
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Sector Reader                            │
//! │              (20-byte header + 4076 payload)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ remaining payload
//!                       ▼
//!               ┌───────────────┐          ┌──────────────┐
//!               │ Chunk Decoder │ ───────▶ │  Dictionary  │
//!               │   (opcodes)   │  chunks  │ (path trie)  │
//!               └───────────────┘          └──────┬───────┘
//!                                                 │
//!                                                 ▼
//!                                          ┌──────────────┐
//!                                          │    Tables    │
//!                                          │ cols/records │
//!                                          └──────────────┘
//! ```
//!
//! Parsing is single-threaded and strictly ordered; separate files can be
//! opened on separate threads.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod encoding;
pub mod chunk;
pub mod sector;
pub mod dict;
pub mod file;
pub mod table;
pub mod debug;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FmpError, Result};
pub use config::Config;
pub use file::FmpFile;
pub use table::{Column, Record, Table};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of fmp12
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Open a container file with the default config
pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<FmpFile> {
    FmpFile::open_path(path)
}
