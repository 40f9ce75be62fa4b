//! Table Module
//!
//! Typed tables, columns and records read out of a finished dictionary.
//!
//! ## Dictionary Coordinates
//! ```text
//! [3, 16, 5]                  table catalog
//!   └── <table id ≥ 128>
//!         └── 16              table name (XOR string)
//! [<table id>, 3, 5]          column catalog
//!   └── <column index>
//!         ├── 2               flag string
//!         └── 16              column name (XOR string)
//! [<table id>, 5]             records
//!   └── <record index>
//!         └── <column index>  value (XOR string)
//! ```
//!
//! Records created with [`Table::new_record`] live only in memory.

mod column;
mod reconstruct;
mod record;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::{FmpError, Result};

pub use column::{AutoEnter, Column, DataType, FieldKind, StorageKind, COLUMN_FLAGS_SIZE};
pub use reconstruct::reconstruct_tables;
pub use record::Record;

/// A table with its columns and records
#[derive(Debug, Clone)]
pub struct Table {
    /// Table id (its path segment under the catalog)
    pub id: u64,

    pub name: String,

    columns: BTreeMap<u64, Column>,

    records: BTreeMap<u64, Record>,

    /// Column name → index
    column_index: Arc<HashMap<String, u64>>,
}

impl Table {
    /// Create a table from its columns; the first column wins a name clash
    pub fn new(id: u64, name: String, columns: BTreeMap<u64, Column>) -> Self {
        let mut column_index = HashMap::with_capacity(columns.len());
        for column in columns.values() {
            if column_index.contains_key(&column.name) {
                tracing::warn!(
                    "Table {}: duplicate column name {:?} at index {}",
                    name,
                    column.name,
                    column.index
                );
                continue;
            }
            column_index.insert(column.name.clone(), column.index);
        }

        Self {
            id,
            name,
            columns,
            records: BTreeMap::new(),
            column_index: Arc::new(column_index),
        }
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        let index = self.column_index.get(name)?;
        self.columns.get(index)
    }

    /// Column by index
    pub fn column_at(&self, index: u64) -> Option<&Column> {
        self.columns.get(&index)
    }

    /// All columns, by index
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Record by index
    pub fn record(&self, index: u64) -> Option<&Record> {
        self.records.get(&index)
    }

    /// All records, by index
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Index the next new record receives: one past the largest in use
    ///
    /// `None` once `u64::MAX` is taken.
    pub fn next_record_index(&self) -> Option<u64> {
        match self.records.keys().next_back() {
            Some(&max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Insert a record decoded from the dictionary
    pub(crate) fn insert_record(&mut self, index: u64, values: BTreeMap<u64, String>) {
        let record = Record::new(index, values, Arc::clone(&self.column_index));
        self.records.insert(index, record);
    }

    /// Create a record in memory from column-name → value pairs
    ///
    /// Fails without inserting anything if a name matches no column or
    /// every record index is taken.
    pub fn new_record<K, V, I>(&mut self, values: I) -> Result<&Record>
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut by_index = BTreeMap::new();
        for (name, value) in values {
            let name = name.as_ref();
            let index = self
                .column_index
                .get(name)
                .ok_or_else(|| FmpError::UnknownColumn(name.to_string()))?;
            by_index.insert(*index, value.into());
        }

        let index = self.next_record_index().ok_or_else(|| self.exhausted())?;
        let record = Record::new(index, by_index, Arc::clone(&self.column_index));

        if self.records.contains_key(&index) {
            return Err(self.exhausted());
        }

        tracing::debug!("Table {}: created record {}", self.name, index);
        Ok(&*self.records.entry(index).or_insert(record))
    }

    fn exhausted(&self) -> FmpError {
        FmpError::RecordIndexExhausted {
            table: self.name.clone(),
            last: self.records.keys().next_back().copied().unwrap_or_default(),
        }
    }
}
