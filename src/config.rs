//! Configuration for fmp12
//!
//! Parse options with sensible defaults.

/// Dictionary coordinate of the table catalog in every known file
pub const DEFAULT_TABLE_ROOT: [u64; 3] = [3, 16, 5];

/// Options controlling how a container is decoded
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Chunk Decoding
    // -------------------------------------------------------------------------
    /// Treat opcodes with both top bits set as "delayed": the low six bits
    /// select the opcode and the path stack is popped once more after the
    /// chunk is applied. Off by default; only `0xE0` is accepted then.
    pub delayed_pop: bool,

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------
    /// Keep every decoded chunk, in file order, on the container
    pub retain_chunks: bool,

    // -------------------------------------------------------------------------
    // Table Reconstruction
    // -------------------------------------------------------------------------
    /// Dictionary path whose children (keys >= 128) are tables
    pub table_root: Vec<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delayed_pop: false,
            retain_chunks: false,
            table_root: DEFAULT_TABLE_ROOT.to_vec(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Enable or disable the delayed-pop opcode modifier
    pub fn delayed_pop(mut self, enabled: bool) -> Self {
        self.config.delayed_pop = enabled;
        self
    }

    /// Keep the flat chunk list after parsing
    pub fn retain_chunks(mut self, enabled: bool) -> Self {
        self.config.retain_chunks = enabled;
        self
    }

    /// Set the dictionary path of the table catalog
    pub fn table_root(mut self, path: impl Into<Vec<u64>>) -> Self {
        self.config.table_root = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
