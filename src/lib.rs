//! # gftext
//!
//! A pure-Rust library for the encrypted message string tables used by a
//! console game engine for localized dialog.
//!
//! ## Supported Formats
//!
//! - **DAT string tables** - Per-line encrypted dialog text with inline
//!   variables, pauses, and ruby annotations
//! - **AHTB name tables** - FNV-1a-64 name-hash companions labeling lines
//!   with human keys
//! - **TSV/CSV tables** - Editable tabular form of the decoded lines
//!
//! ## Quick Start
//!
//! ### Decoding a string table
//!
//! ```no_run
//! use gftext::formats::text::{GameVersion, TextConfig, read_text};
//!
//! let config = TextConfig::new(GameVersion::Any);
//! let file = read_text("common.dat", &config, false)?;
//! for line in &file.lines {
//!     println!("{:04X} {}", line.flags, line.text);
//! }
//! # Ok::<(), gftext::Error>(())
//! ```
//!
//! ### Round-tripping
//!
//! ```no_run
//! use gftext::formats::text::{GameVersion, TextConfig, parse_text_bytes, text_to_bytes};
//!
//! let config = TextConfig::new(GameVersion::Any);
//! let data = std::fs::read("common.dat")?;
//! let file = parse_text_bytes(&data, &config, false)?;
//! assert_eq!(text_to_bytes(&file)?, data);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use gftext::prelude::*;
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `gftext` command-line binary

pub mod batch;
pub mod converter;
pub mod error;
pub mod formats;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::batch::{BatchTextResult, batch_export, batch_import, find_dat_files, find_table_files};
    pub use crate::converter::{convert_dat_to_table, convert_table_to_dat};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::formats::ahtb::{
        AhtbEntry, AhtbTable, ahtb_to_bytes, parse_ahtb_bytes, read_ahtb, write_ahtb,
    };
    pub use crate::formats::text::{
        ExportFormat, GameVersion, TextConfig, TextFile, TextLine, export_table, import_table,
        parse_text_bytes, read_text, text_to_bytes, write_text,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
