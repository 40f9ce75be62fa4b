//! Table reconstruction
//!
//! Pure read pass over a finished dictionary.

use std::collections::BTreeMap;

use crate::dict::{DictEntry, Dictionary};
use crate::encoding::decode_string;

use super::{Column, Table};

/// Catalog children below this key are not tables
pub const MIN_TABLE_ID: u64 = 128;

/// Child holding a table's or column's name
const NAME_KEY: u64 = 16;

/// Child holding a column's flag string
const FLAGS_KEY: u64 = 2;

/// Column catalog, relative to the table id
const COLUMNS_PATH: [u64; 2] = [3, 5];

/// Record store, relative to the table id
const RECORDS_KEY: u64 = 5;

/// Materialize every table under `table_root`
pub fn reconstruct_tables(dict: &Dictionary, table_root: &[u64]) -> Vec<Table> {
    dict.children(table_root)
        .filter(|(id, _)| *id >= MIN_TABLE_ID)
        .map(|(id, entry)| {
            let mut table = Table::new(id, entry_name(entry), read_columns(dict, id));

            for (index, record) in dict.children(&[id, RECORDS_KEY]) {
                table.insert_record(index, read_values(record));
            }

            tracing::debug!(
                "Table {} ({}): {} columns, {} records",
                table.id,
                table.name,
                table.columns().count(),
                table.record_count()
            );
            table
        })
        .collect()
}

fn read_columns(dict: &Dictionary, table_id: u64) -> BTreeMap<u64, Column> {
    let path = [table_id, COLUMNS_PATH[0], COLUMNS_PATH[1]];

    dict.children(&path)
        .map(|(index, entry)| {
            let flags = entry.get_value(&[FLAGS_KEY]).map(|v| &v[..]).unwrap_or(&[]);
            (index, Column::from_flags(index, entry_name(entry), flags))
        })
        .collect()
}

fn read_values(record: &DictEntry) -> BTreeMap<u64, String> {
    record
        .children
        .iter()
        .filter_map(|(column, entry)| {
            let value = entry.value.as_ref()?;
            Some((*column, decode_string(value)))
        })
        .collect()
}

fn entry_name(entry: &DictEntry) -> String {
    entry
        .get_value(&[NAME_KEY])
        .map(|v| decode_string(v))
        .unwrap_or_default()
}
