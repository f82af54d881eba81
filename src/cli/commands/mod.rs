use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::formats::text::{ExportFormat, GameVersion, TextConfig};

pub mod ahtb;
pub mod export;
pub mod import;
pub mod show;
pub mod vars;

#[derive(Subcommand)]
pub enum Commands {
    /// Export DAT string tables to editable TSV/CSV tables
    Export {
        /// Source .dat file, or a directory to convert recursively
        #[arg(short, long)]
        source: PathBuf,

        /// Output file or directory (defaults to alongside the source)
        #[arg(short, long)]
        destination: Option<PathBuf>,

        /// Table format: tsv or csv
        #[arg(short, long, default_value = "tsv")]
        format: String,

        /// Game version for the variable table: any, swsh, la, sv
        #[arg(short, long, default_value = "any")]
        game: String,

        /// JSON file with a custom variable table (overrides --game)
        #[arg(long)]
        vars_file: Option<PathBuf>,

        /// Remap private-use glyphs to standard Unicode
        #[arg(long)]
        remap: bool,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Import edited TSV/CSV tables back into DAT string tables
    Import {
        /// Source table file, or a directory to convert recursively
        #[arg(short, long)]
        source: PathBuf,

        /// Output file or directory (defaults to alongside the source)
        #[arg(short, long)]
        destination: Option<PathBuf>,

        /// Game version for the variable table: any, swsh, la, sv
        #[arg(short, long, default_value = "any")]
        game: String,

        /// JSON file with a custom variable table (overrides --game)
        #[arg(long)]
        vars_file: Option<PathBuf>,

        /// Remap standard Unicode back to private-use glyphs
        #[arg(long)]
        remap: bool,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the decoded lines of a DAT string table
    Show {
        /// The .dat file to decode
        path: PathBuf,

        /// Game version for the variable table: any, swsh, la, sv
        #[arg(short, long, default_value = "any")]
        game: String,

        /// JSON file with a custom variable table (overrides --game)
        #[arg(long)]
        vars_file: Option<PathBuf>,

        /// Remap private-use glyphs to standard Unicode
        #[arg(long)]
        remap: bool,

        /// Maximum number of lines to print
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// List the variable table for a game version
    Vars {
        /// Game version: any, swsh, la, sv
        #[arg(short, long, default_value = "any")]
        game: String,

        /// JSON file with a custom variable table (overrides --game)
        #[arg(long)]
        vars_file: Option<PathBuf>,
    },

    /// Inspect an AHTB name-hash table
    Ahtb {
        /// The .tbl file to read
        path: PathBuf,

        /// Maximum number of entries to print
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Export {
                source,
                destination,
                format,
                game,
                vars_file,
                remap,
                quiet,
            } => {
                let config = load_config(game, vars_file.as_deref())?;
                let format = parse_format(format)?;
                export::run(source, destination.as_deref(), &config, format, *remap, *quiet)
            }
            Commands::Import {
                source,
                destination,
                game,
                vars_file,
                remap,
                quiet,
            } => {
                let config = load_config(game, vars_file.as_deref())?;
                import::run(source, destination.as_deref(), &config, *remap, *quiet)
            }
            Commands::Show {
                path,
                game,
                vars_file,
                remap,
                limit,
            } => {
                let config = load_config(game, vars_file.as_deref())?;
                show::run(path, &config, *remap, *limit)
            }
            Commands::Vars { game, vars_file } => {
                let config = load_config(game, vars_file.as_deref())?;
                vars::run(&config)
            }
            Commands::Ahtb { path, limit } => ahtb::run(path, *limit),
        }
    }
}

/// Resolve the variable table from the version selector or a JSON file.
fn load_config(game: &str, vars_file: Option<&Path>) -> anyhow::Result<TextConfig> {
    if let Some(path) = vars_file {
        return Ok(TextConfig::from_json_file(path)?);
    }
    let version = GameVersion::parse(game)
        .ok_or_else(|| anyhow::anyhow!("unknown game version '{game}' (any, swsh, la, sv)"))?;
    Ok(TextConfig::new(version))
}

fn parse_format(format: &str) -> anyhow::Result<ExportFormat> {
    ExportFormat::from_extension(format)
        .ok_or_else(|| anyhow::anyhow!("unknown table format '{format}' (tsv, csv)"))
}
