//! Tabular export/import of decoded lines
//!
//! Writes a string table out as TSV/CSV for editing in spreadsheet
//! applications, and reads an edited table back into a [`TextFile`].
//!
//! Columns:
//! 1. Key (AHTB name when a table is paired, otherwise empty)
//! 2. Flags (4-digit uppercase hex)
//! 3. Text (escaped form; last so embedded delimiters cannot shift columns)
//!
//! Row order is the line order: it determines each line's index and
//! therefore its cipher key, so malformed rows are fatal on import rather
//! than skipped.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::{TextConfig, TextFile, TextLine};
use crate::error::{Error, Result};

/// Export format for tabular editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Tab-separated values (recommended for spreadsheets)
    Tsv,
    /// Comma-separated values
    Csv,
}

impl ExportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Csv => "csv",
        }
    }

    /// Get the delimiter character
    #[must_use]
    pub fn delimiter(&self) -> char {
        match self {
            Self::Tsv => '\t',
            Self::Csv => ',',
        }
    }

    /// Pick the format matching a file extension, if any.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "tsv" => Some(Self::Tsv),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Export a text file to a table
///
/// When `keys` is given it must parallel the lines (AHTB names); the key
/// column is left empty otherwise.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn export_table<P: AsRef<Path>>(
    file: &TextFile,
    keys: Option<&[String]>,
    path: P,
    format: ExportFormat,
) -> Result<usize> {
    let out = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(out);
    let delimiter = format.delimiter();

    writeln!(writer, "Key{delimiter}Flags{delimiter}Text")?;

    for (index, line) in file.lines.iter().enumerate() {
        let key = keys.and_then(|keys| keys.get(index)).map_or("", String::as_str);
        let escaped_text = escape_for_delimited(&line.text, delimiter);
        writeln!(
            writer,
            "{key}{delimiter}{:04X}{delimiter}{escaped_text}",
            line.flags
        )?;
    }

    writer.flush()?;
    Ok(file.lines.len())
}

/// Import a table back into a text file
///
/// The key column is ignored (names live in the AHTB table, not the `.dat`).
///
/// # Errors
/// Returns an error if the file cannot be read, a row is missing columns,
/// or a flags value is not 16-bit hex.
pub fn import_table<P: AsRef<Path>>(
    path: P,
    config: &TextConfig,
    format: ExportFormat,
    remap_chars: bool,
) -> Result<TextFile> {
    let input = std::fs::File::open(path)?;
    let reader = BufReader::new(input);
    let delimiter = format.delimiter();

    let mut file = TextFile::with_remap(config.clone(), remap_chars);
    let mut rows = reader.lines().enumerate();

    // Skip header
    if rows.next().is_none() {
        return Ok(file);
    }

    for (row_index, row) in rows {
        let row = row?;
        if row.trim().is_empty() {
            continue;
        }

        let row_number = row_index + 1;
        // Text is the last column, so embedded delimiters stay inside it.
        let parts: Vec<&str> = row.splitn(3, delimiter).collect();
        if parts.len() < 3 {
            return Err(Error::MalformedTableRow { row: row_number });
        }

        let flags_text = parts[1].trim();
        let flags =
            u16::from_str_radix(flags_text, 16).map_err(|_| Error::InvalidFlags {
                value: flags_text.to_string(),
                row: row_number,
            })?;
        let text = unescape_from_delimited(parts[2]);

        file.push(TextLine { text, flags });
    }

    Ok(file)
}

/// Escape text for TSV/CSV output
fn escape_for_delimited(text: &str, delimiter: char) -> String {
    // Escaped line text never contains real newlines, but it can contain
    // the delimiter (VAR argument commas) or quotes.
    if text.contains(delimiter) || text.contains('\n') || text.contains('\r') || text.contains('"')
    {
        let escaped = text.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        text.to_string()
    }
}

/// Unescape text from TSV/CSV input
fn unescape_from_delimited(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}
