//! Column definitions
//!
//! A column's kind, type, storage and auto-enter behaviour are packed into a
//! fixed-layout flag string stored next to its name.

/// Minimum length of the column flag string
pub const COLUMN_FLAGS_SIZE: usize = 26;

// Byte offsets inside the flag string
const FIELD_KIND_BYTE: usize = 0;
const DATA_TYPE_BYTE: usize = 1;
const PRESET_BYTE: usize = 4;
const INDEX_BYTE: usize = 8;
const STORAGE_BYTE: usize = 9;
const AUTO_ENTER_BYTE: usize = 11;
const REPETITIONS_BYTE: usize = 25;

/// Bit of the index byte marking an indexed column
const INDEXED_BIT: u8 = 0x80;

/// Bit of the auto-enter byte selecting the preset table
const PRESET_BIT: u8 = 0x01;

/// Field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Simple,
    Calculation,
    Script,
    Unknown(u8),
}

impl From<u8> for FieldKind {
    fn from(byte: u8) -> Self {
        match byte {
            1 => FieldKind::Simple,
            2 => FieldKind::Calculation,
            3 => FieldKind::Script,
            other => FieldKind::Unknown(other),
        }
    }
}

/// Underlying data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Text,
    Number,
    Date,
    Time,
    Timestamp,
    Container,
    Unknown(u8),
}

impl From<u8> for DataType {
    fn from(byte: u8) -> Self {
        match byte {
            1 => DataType::Text,
            2 => DataType::Number,
            3 => DataType::Date,
            4 => DataType::Time,
            5 => DataType::Timestamp,
            6 => DataType::Container,
            other => DataType::Unknown(other),
        }
    }
}

/// Storage kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Regular,
    Global,
    Calculation,
    UnstoredCalculation,
    Unknown(u8),
}

impl From<u8> for StorageKind {
    fn from(byte: u8) -> Self {
        match byte {
            0 => StorageKind::Regular,
            1 => StorageKind::Global,
            8 => StorageKind::Calculation,
            10 => StorageKind::UnstoredCalculation,
            other => StorageKind::Unknown(other),
        }
    }
}

/// How a column's value is filled in automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoEnter {
    None,
    Data,
    SerialNumber,
    Calculation,
    CalculationReplacingExistingValue,
    FromLastVisitedRecord,
    CreationDate,
    CreationTime,
    CreationTimestamp,
    CreatorName,
    CreatorAccountName,
    ModificationDate,
    ModificationTime,
    ModificationTimestamp,
    ModifierName,
    ModifierAccountName,
}

impl AutoEnter {
    /// Resolve from the auto-enter byte and the preset selector
    pub fn from_flags(options: u8, preset: u8) -> Self {
        if options & PRESET_BIT != 0 {
            Self::from_preset(preset)
        } else {
            Self::from_option(options)
        }
    }

    /// Creation / modification stamps
    fn from_preset(preset: u8) -> Self {
        match preset {
            0 => AutoEnter::CreationDate,
            1 => AutoEnter::CreationTime,
            2 => AutoEnter::CreationTimestamp,
            3 => AutoEnter::CreatorName,
            4 => AutoEnter::CreatorAccountName,
            5 => AutoEnter::ModificationDate,
            6 => AutoEnter::ModificationTime,
            7 => AutoEnter::ModificationTimestamp,
            8 => AutoEnter::ModifierName,
            9 => AutoEnter::ModifierAccountName,
            _ => AutoEnter::None,
        }
    }

    fn from_option(options: u8) -> Self {
        match options {
            2 => AutoEnter::SerialNumber,
            4 => AutoEnter::Data,
            8 | 32 => AutoEnter::Calculation,
            16 => AutoEnter::FromLastVisitedRecord,
            136 => AutoEnter::CalculationReplacingExistingValue,
            _ => AutoEnter::None,
        }
    }
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column index (its path segment)
    pub index: u64,
    pub name: String,
    pub field_kind: FieldKind,
    pub data_type: DataType,
    pub storage: StorageKind,
    pub auto_enter: AutoEnter,
    pub repetitions: u8,
    pub indexed: bool,
}

impl Column {
    /// Build a column from its stored flag string
    ///
    /// Missing trailing bytes read as zero.
    pub fn from_flags(index: u64, name: String, flags: &[u8]) -> Self {
        if flags.len() < COLUMN_FLAGS_SIZE {
            tracing::warn!(
                "Column {} ({}) has {} flag bytes, expected {}",
                index,
                name,
                flags.len(),
                COLUMN_FLAGS_SIZE
            );
        }
        let byte = |at: usize| flags.get(at).copied().unwrap_or(0);

        Self {
            index,
            name,
            field_kind: FieldKind::from(byte(FIELD_KIND_BYTE)),
            data_type: DataType::from(byte(DATA_TYPE_BYTE)),
            storage: StorageKind::from(byte(STORAGE_BYTE)),
            auto_enter: AutoEnter::from_flags(byte(AUTO_ENTER_BYTE), byte(PRESET_BYTE)),
            repetitions: byte(REPETITIONS_BYTE),
            indexed: byte(INDEX_BYTE) & INDEXED_BIT != 0,
        }
    }
}
