//! fmpdump
//!
//! Command-line inspector for .fmp12 containers.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use fmp12::{debug, Config, FmpFile};
use tracing_subscriber::{fmt, EnvFilter};

const PARSER_PANICKED: &str = "parser thread panicked";

/// fmp12 container inspector
#[derive(Parser, Debug)]
#[command(name = "fmpdump")]
#[command(about = "Inspect .fmp12 database containers")]
#[command(version)]
struct Args {
    /// Honour the delayed-pop opcode modifier
    #[arg(long)]
    delayed_pop: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print header fields and sizes (files are parsed in parallel)
    Info {
        /// Container files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List tables and their columns
    Tables {
        file: PathBuf,
    },

    /// Print every record of a table
    Records {
        file: PathBuf,

        /// Table name
        table: String,
    },

    /// Print the decoded chunk list
    Chunks {
        file: PathBuf,
    },

    /// Print the dictionary depth-first
    Dict {
        file: PathBuf,
    },

    /// Write <base>.chunks and <base>.dicts next to the file (or at --base)
    Dump {
        file: PathBuf,

        /// Output path prefix
        #[arg(long)]
        base: Option<PathBuf>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fmp12=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder()
        .delayed_pop(args.delayed_pop)
        .retain_chunks(matches!(
            args.command,
            Commands::Chunks { .. } | Commands::Dump { .. }
        ))
        .build();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Info { files } => info(&mut out, &files, &config),
        Commands::Tables { file } => {
            let fmp = open(&file, &config)?;
            for table in fmp.tables() {
                writeln!(out, "{} (id {}, {} records)", table.name, table.id, table.record_count())?;
                for column in table.columns() {
                    writeln!(
                        out,
                        "  {:>4} {:<24} {:?} {:?} {:?} auto={:?} reps={} indexed={}",
                        column.index,
                        column.name,
                        column.field_kind,
                        column.data_type,
                        column.storage,
                        column.auto_enter,
                        column.repetitions,
                        column.indexed
                    )?;
                }
            }
            Ok(())
        }
        Commands::Records { file, table } => {
            let fmp = open(&file, &config)?;
            let Some(table) = fmp.table(&table) else {
                return Err(format!("no table named {:?}", table).into());
            };
            for record in table.records() {
                let fields: Vec<String> = table
                    .columns()
                    .map(|c| format!("{}={:?}", c.name, record.value_at(c.index).unwrap_or("")))
                    .collect();
                writeln!(out, "#{} {}", record.index(), fields.join(" "))?;
            }
            Ok(())
        }
        Commands::Chunks { file } => {
            let fmp = open(&file, &config)?;
            Ok(debug::write_chunks(&mut out, fmp.chunks())?)
        }
        Commands::Dict { file } => {
            let fmp = open(&file, &config)?;
            Ok(debug::write_dictionary(&mut out, fmp.dictionary())?)
        }
        Commands::Dump { file, base } => {
            let fmp = open(&file, &config)?;
            let base = base.unwrap_or(file);
            debug::write_debug_files(&base, fmp.chunks(), fmp.dictionary())?;
            tracing::info!("Wrote {}.chunks and {}.dicts", base.display(), base.display());
            Ok(())
        }
    }
}

fn open(path: &Path, config: &Config) -> fmp12::Result<FmpFile> {
    let file = std::fs::File::open(path)?;
    FmpFile::open_with(io::BufReader::new(file), config)
}

/// Parse every file on its own thread; files share no state
fn info<W: Write>(
    out: &mut W,
    files: &[PathBuf],
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    // `None` marks a parser thread that panicked
    let results: Vec<Option<fmp12::Result<FmpFile>>> = crossbeam::scope(|s| {
        let handles: Vec<_> = files
            .iter()
            .map(|path| s.spawn(move |_| open(path, config)))
            .collect();
        handles.into_iter().map(|h| h.join().ok()).collect()
    })
    .map_err(|_| PARSER_PANICKED)?;

    let mut failed: Option<Box<dyn std::error::Error>> = None;
    for (path, result) in files.iter().zip(results) {
        match result {
            Some(Ok(fmp)) => writeln!(
                out,
                "{}: {} {} size={} sectors={} walked={} tables={} warnings={}",
                path.display(),
                fmp.application_name(),
                fmp.version_date(),
                fmp.file_size(),
                fmp.num_sectors(),
                fmp.sectors_walked(),
                fmp.tables().len(),
                fmp.warnings().len()
            )?,
            Some(Err(e)) => {
                writeln!(out, "{}: {}", path.display(), e)?;
                failed = Some(e.into());
            }
            None => {
                writeln!(out, "{}: {}", path.display(), PARSER_PANICKED)?;
                failed = Some(PARSER_PANICKED.into());
            }
        }
    }

    match failed {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
