//! Dictionary Module
//!
//! The hierarchical key-value tree assembled from every chunk in the file.
//!
//! ## Responsibilities
//! - Address nodes by paths of unsigned integer segments
//! - Create missing ancestors on every write
//! - Track the path stack while chunks stream in
//! - Report tolerated anomalies on a warning channel
//!
//! ## Data Structure Choice
//! Nested owned maps (BTreeMap per node):
//! - A write walks down once, creating nodes as it goes
//! - Sorted children give stable, depth-first dumps
//! - Nodes are never deleted

mod assembly;
mod trie;

pub use assembly::{apply, Assembler, AssemblyWarning, PathStack};
pub use trie::{DictEntry, Dictionary};
