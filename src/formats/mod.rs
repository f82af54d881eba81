//! File format handlers

pub mod ahtb;
pub mod text;

// Re-export main types for convenience
pub use ahtb::{AhtbEntry, AhtbTable, parse_ahtb_bytes, read_ahtb, write_ahtb};
pub use text::{
    GameVersion, TextConfig, TextFile, TextLine, parse_text_bytes, read_text, text_to_bytes,
    write_text,
};
