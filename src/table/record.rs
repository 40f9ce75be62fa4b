//! Records
//!
//! A record maps column indices to decoded text values.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// One record of a table
#[derive(Debug, Clone)]
pub struct Record {
    index: u64,
    values: BTreeMap<u64, String>,
    /// Column name → index, shared with the owning table
    columns: Arc<HashMap<String, u64>>,
}

impl Record {
    pub(crate) fn new(
        index: u64,
        values: BTreeMap<u64, String>,
        columns: Arc<HashMap<String, u64>>,
    ) -> Self {
        Self {
            index,
            values,
            columns,
        }
    }

    /// Record index (its path segment)
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Value of the named column
    pub fn value(&self, column: &str) -> Option<&str> {
        let index = self.columns.get(column)?;
        self.value_at(*index)
    }

    /// Value of the column with the given index
    pub fn value_at(&self, column_index: u64) -> Option<&str> {
        self.values.get(&column_index).map(String::as_str)
    }

    /// All values, by column index
    pub fn values(&self) -> impl Iterator<Item = (u64, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
