//! Path trie
//!
//! Nodes own an optional value and their children keyed by the next path segment.

use std::collections::BTreeMap;

use bytes::{Bytes, BytesMut};

/// One node of the dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictEntry {
    /// Raw value stored at this node, if any
    pub value: Option<Bytes>,

    /// Child nodes keyed by path segment
    pub children: BTreeMap<u64, DictEntry>,
}

impl DictEntry {
    /// Value of a descendant, relative to this node
    pub fn get_value(&self, path: &[u64]) -> Option<&Bytes> {
        self.get_entry(path)?.value.as_ref()
    }

    /// Descendant node, relative to this node
    pub fn get_entry(&self, path: &[u64]) -> Option<&DictEntry> {
        path.iter()
            .try_fold(self, |entry, key| entry.children.get(key))
    }

    /// Descendant node, created along with any missing ancestors
    fn entry_mut(&mut self, path: &[u64]) -> &mut DictEntry {
        path.iter().fold(self, |entry, key| {
            entry.children.entry(*key).or_default()
        })
    }

    /// Number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// Hierarchical key-value store addressed by integer paths
///
/// The root node holds the value written at the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    root: DictEntry,
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node
    pub fn root(&self) -> &DictEntry {
        &self.root
    }

    /// Node at `path`
    pub fn get_entry(&self, path: &[u64]) -> Option<&DictEntry> {
        self.root.get_entry(path)
    }

    /// Value at `path`
    pub fn get_value(&self, path: &[u64]) -> Option<&Bytes> {
        self.root.get_value(path)
    }

    /// Children of the node at `path` (empty if the node is missing)
    pub fn children(&self, path: &[u64]) -> impl Iterator<Item = (u64, &DictEntry)> {
        self.get_entry(path)
            .into_iter()
            .flat_map(|entry| entry.children.iter().map(|(k, v)| (*k, v)))
    }

    /// Write a value at `path`, replacing any existing value
    pub fn set_value(&mut self, path: &[u64], value: Bytes) {
        self.root.entry_mut(path).value = Some(value);
    }

    /// Append bytes to the value at `path`, starting from empty if absent
    pub fn append_value(&mut self, path: &[u64], bytes: &[u8]) {
        let entry = self.root.entry_mut(path);
        let combined = match entry.value.take() {
            Some(existing) if !existing.is_empty() => {
                let mut buf = BytesMut::with_capacity(existing.len() + bytes.len());
                buf.extend_from_slice(&existing);
                buf.extend_from_slice(bytes);
                buf.freeze()
            }
            _ => Bytes::copy_from_slice(bytes),
        };
        entry.value = Some(combined);
    }

    /// Total number of nodes, root excluded
    pub fn len(&self) -> usize {
        self.root.descendant_count()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty() && self.root.value.is_none()
    }
}
