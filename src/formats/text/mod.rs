//! Encrypted `.dat` message string-table format
//!
//! Each file holds an ordered sequence of dialog lines. Lines are encoded
//! as streams of 16-bit code units carrying free-form text plus inline
//! control sequences (variable substitutions, pauses, null-text references,
//! ruby annotations), then individually encrypted with a per-line keystream
//! before being packed behind a fixed header and record table.
//!
//! Decoded lines use an escaped text form (`\n`, `[VAR ...]`, `{base|ruby}`)
//! that round-trips byte-exact through [`reader`] and [`writer`].

mod cipher;
mod charmap;
mod config;
mod decoder;
mod encoder;
mod reader;
mod table;
mod writer;

pub use cipher::{crypt, line_key};
pub use config::{GameVersion, TextConfig};
pub use reader::{parse_text_bytes, read_text};
pub use table::{export_table, import_table, ExportFormat};
pub use writer::{text_to_bytes, write_text};

use crate::error::{Error, Result};

/// Marker unit that introduces a variable sequence.
pub const VARIABLE_MARKER: u16 = 0x0010;

/// Unit that terminates a line; never rendered.
pub const TERMINATOR: u16 = 0x0000;

/// Variable opcode: wait for a button press, then scroll (`\r`).
pub const TEXT_RETURN: u16 = 0xBE00;

/// Variable opcode: wait for a button press, then clear (`\c`).
pub const TEXT_CLEAR: u16 = 0xBE01;

/// Variable opcode: timed pause, one duration argument (`[WAIT n]`).
pub const TEXT_WAIT: u16 = 0xBE02;

/// Variable opcode: null-text reference, one line-number argument (`[~ n]`).
pub const TEXT_NULL: u16 = 0xBDFF;

/// Variable opcode: ruby/furigana annotation (`{base|ruby}`).
pub const TEXT_RUBY: u16 = 0xFF01;

/// A single string-table entry: escaped text plus an opaque flags bitfield.
///
/// The codec passes `flags` through unmodified; it assigns them no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    /// The line in escaped human-readable form (never raw code units).
    pub text: String,
    /// Per-line bitfield, preserved as stored.
    pub flags: u16,
}

impl TextLine {
    /// Create a line with the given text and zero flags.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flags: 0,
        }
    }
}

/// An ordered collection of [`TextLine`] entries plus the variable table it
/// was built with.
///
/// Order is significant: the line index selects both the decryption key and,
/// when an AHTB table is paired with the file, the associated key name.
#[derive(Debug, Clone)]
pub struct TextFile {
    /// The lines in file order.
    pub lines: Vec<TextLine>,
    config: TextConfig,
    remap_chars: bool,
    set_empty_text: bool,
}

impl TextFile {
    /// Create an empty file using the given variable table.
    #[must_use]
    pub fn new(config: TextConfig) -> Self {
        Self::with_remap(config, false)
    }

    /// Create an empty file with character remapping enabled or disabled.
    #[must_use]
    pub fn with_remap(config: TextConfig, remap_chars: bool) -> Self {
        Self {
            lines: Vec::new(),
            config,
            remap_chars,
            set_empty_text: true,
        }
    }

    /// The variable table this file was built with.
    #[must_use]
    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Whether private-use-area glyph remapping is applied.
    #[must_use]
    pub fn remap_chars(&self) -> bool {
        self.remap_chars
    }

    /// Whether empty lines encode as `[~ <index>]` references (default on).
    #[must_use]
    pub fn empty_line_substitution(&self) -> bool {
        self.set_empty_text
    }

    /// Enable or disable empty-line substitution for encoding.
    pub fn set_empty_line_substitution(&mut self, enabled: bool) {
        self.set_empty_text = enabled;
    }

    /// Number of lines in the file.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the file has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append a line.
    pub fn push(&mut self, line: TextLine) {
        self.lines.push(line);
    }
}

/// Size of the serialized header in bytes.
pub(crate) const HEADER_SIZE: usize = 20;

/// Absolute offset of the data section. Line record offsets are relative to
/// this, and the `section_length` word at byte 16 counts as its first field.
pub(crate) const DATA_OFFSET: usize = 16;

/// Size of each line record in bytes.
pub(crate) const LINE_RECORD_SIZE: usize = 8;

/// The fixed file header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextHeader {
    pub sections: u16,
    pub line_count: u16,
    pub total_length: u32,
    pub initial_key: u32,
    pub data_offset: u32,
    pub section_length: u32,
}

impl TextHeader {
    /// Compose a header for a freshly laid-out file.
    pub fn new(line_count: u16, total_length: u32) -> Self {
        Self {
            sections: 1,
            line_count,
            total_length,
            initial_key: 0,
            data_offset: DATA_OFFSET as u32,
            section_length: total_length,
        }
    }

    /// Check every header invariant against the actual file length.
    pub fn validate(&self, file_length: u64) -> Result<()> {
        if self.initial_key != 0 {
            return Err(Error::InvalidInitialKey {
                key: self.initial_key,
            });
        }
        if self.sections != 1 {
            return Err(Error::InvalidSectionCount {
                count: self.sections,
            });
        }
        if self.data_offset != DATA_OFFSET as u32 {
            return Err(Error::InvalidDataOffset {
                offset: self.data_offset,
            });
        }
        if u64::from(self.data_offset) + u64::from(self.total_length) != file_length {
            return Err(Error::DataLengthMismatch {
                data_length: self.total_length,
                file_length,
            });
        }
        if self.section_length != self.total_length {
            return Err(Error::SectionLengthMismatch {
                section_length: self.section_length,
                data_length: self.total_length,
            });
        }
        Ok(())
    }
}

/// One entry of the line metadata table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineRecord {
    /// Byte offset of the line's data, relative to the data section start.
    pub offset: i32,
    /// Length in 16-bit code units, excluding alignment padding.
    pub length: u16,
    /// Opaque per-line flags.
    pub flags: u16,
}
