//! File header block
//!
//! Fixed-offset parse of block 0. This block is never chunk-decoded.

use std::io::Read;

use chrono::NaiveDate;

use crate::error::{FmpError, Result};

use super::SECTOR_SIZE;

/// Magic constant at offset 0
pub(crate) const MAGIC: &[u8; 15] =
    b"\x00\x01\x00\x00\x00\x02\x00\x01\x00\x05\x00\x02\x00\x02\xC0";

/// Format tag following the magic
pub(crate) const FORMAT_TAG: &[u8; 5] = b"HBAM7";

/// Version date field: offset and width
pub(crate) const VERSION_DATE_OFFSET: usize = 531;
pub(crate) const VERSION_DATE_SIZE: usize = 7;

/// Length byte of the application name, followed by the name itself
pub(crate) const APP_NAME_LEN_OFFSET: usize = 541;

/// `YYMMMDD`, e.g. `25JAN11`
const VERSION_DATE_FORMAT: &str = "%y%b%d";

/// Fields read from the header block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Format version date
    pub version_date: NaiveDate,

    /// Creator / application name, e.g. "Pro 12.0"
    pub application_name: String,
}

impl FileHeader {
    /// Read and validate the header block from the current stream position
    pub fn read<R: Read>(stream: &mut R) -> Result<Self> {
        let mut block = vec![0u8; SECTOR_SIZE];
        stream.read_exact(&mut block)?;
        Self::parse(&block)
    }

    /// Parse a full header block
    pub fn parse(block: &[u8]) -> Result<Self> {
        if block.len() < SECTOR_SIZE {
            return Err(FmpError::BadHeader(format!(
                "header block is {} bytes, expected {}",
                block.len(),
                SECTOR_SIZE
            )));
        }

        if &block[..MAGIC.len()] != MAGIC {
            return Err(FmpError::BadMagic);
        }
        if &block[MAGIC.len()..MAGIC.len() + FORMAT_TAG.len()] != FORMAT_TAG {
            return Err(FmpError::BadMagic);
        }

        let raw_date = &block[VERSION_DATE_OFFSET..VERSION_DATE_OFFSET + VERSION_DATE_SIZE];
        let date_text = std::str::from_utf8(raw_date)
            .map_err(|_| FmpError::BadHeader(format!("version date {:02x?} is not text", raw_date)))?;
        let version_date = NaiveDate::parse_from_str(date_text, VERSION_DATE_FORMAT)
            .map_err(|e| FmpError::BadHeader(format!("version date {:?}: {}", date_text, e)))?;

        // The length byte caps the name at 255 bytes, always inside the block
        let name_len = usize::from(block[APP_NAME_LEN_OFFSET]);
        let name_start = APP_NAME_LEN_OFFSET + 1;
        let application_name =
            String::from_utf8_lossy(&block[name_start..name_start + name_len]).into_owned();

        Ok(Self {
            version_date,
            application_name,
        })
    }
}
