//! Diagnostic dumps
//!
//! Text renderings of the chunk list and the dictionary. Not part of the
//! format; meant for eyeballing a file while reverse engineering it.
//!
//! ```text
//! <PathPush(2)> 81
//! <SimpleKeyValue(11)> 0f342e2e333e2f363f
//! ...
//! 3.16.5.129.16 = 0f342e2e333e2f363f "Untitled"
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::chunk::Chunk;
use crate::dict::{DictEntry, Dictionary};
use crate::encoding::decode_string;
use crate::error::Result;

/// Write one line per chunk: `<Type(length)>` and the raw value in hex
pub fn write_chunks<W: Write>(writer: &mut W, chunks: &[Chunk]) -> Result<()> {
    for chunk in chunks {
        writeln!(writer, "{} {}", chunk, hex(&chunk.value))?;
    }
    Ok(())
}

/// Write every valued node depth-first as `path = hex "decoded"`
pub fn write_dictionary<W: Write>(writer: &mut W, dict: &Dictionary) -> Result<()> {
    write!(writer, "{}", dict)?;
    Ok(())
}

/// Write `<base>.chunks` and `<base>.dicts`
pub fn write_debug_files(base: &Path, chunks: &[Chunk], dict: &Dictionary) -> Result<()> {
    let mut chunk_file = BufWriter::new(File::create(with_suffix(base, "chunks"))?);
    write_chunks(&mut chunk_file, chunks)?;
    chunk_file.flush()?;

    let mut dict_file = BufWriter::new(File::create(with_suffix(base, "dicts"))?);
    write_dictionary(&mut dict_file, dict)?;
    dict_file.flush()?;

    Ok(())
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut path = Vec::new();
        render(f, self.root(), &mut path)
    }
}

fn render(f: &mut fmt::Formatter<'_>, entry: &DictEntry, path: &mut Vec<u64>) -> fmt::Result {
    if let Some(value) = &entry.value {
        writeln!(
            f,
            "{} = {} {:?}",
            dotted(path),
            hex(value),
            decode_string(value)
        )?;
    }
    for (key, child) in &entry.children {
        path.push(*key);
        render(f, child, path)?;
        path.pop();
    }
    Ok(())
}

fn dotted(path: &[u64]) -> String {
    if path.is_empty() {
        return "(root)".to_string();
    }
    let parts: Vec<String> = path.iter().map(u64::to_string).collect();
    parts.join(".")
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn with_suffix(base: &Path, suffix: &str) -> std::path::PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    name.into()
}
