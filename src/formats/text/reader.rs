//! `.dat` string-table reading and parsing

#![allow(clippy::cast_possible_truncation)]

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::cipher::{crypt, line_key};
use super::config::TextConfig;
use super::decoder::decode_units;
use super::{DATA_OFFSET, LineRecord, TextFile, TextHeader, TextLine};
use crate::error::{Error, Result};

/// Read a .dat string table from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, and any of
/// the [`parse_text_bytes`] errors for invalid contents.
pub fn read_text<P: AsRef<Path>>(
    path: P,
    config: &TextConfig,
    remap_chars: bool,
) -> Result<TextFile> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_text_bytes(&buffer, config, remap_chars)
}

/// Parse .dat string-table data from bytes
///
/// # Errors
///
/// Returns a format error if a header invariant is violated or a line record
/// points outside the data section, a grammar error if decrypted line data
/// is structurally truncated, and [`Error::Io`] on short reads.
pub fn parse_text_bytes(data: &[u8], config: &TextConfig, remap_chars: bool) -> Result<TextFile> {
    let mut cursor = Cursor::new(data);

    let header = TextHeader {
        sections: cursor.read_u16::<LittleEndian>()?,
        line_count: cursor.read_u16::<LittleEndian>()?,
        total_length: cursor.read_u32::<LittleEndian>()?,
        initial_key: cursor.read_u32::<LittleEndian>()?,
        data_offset: cursor.read_u32::<LittleEndian>()?,
        section_length: cursor.read_u32::<LittleEndian>()?,
    };
    header.validate(data.len() as u64)?;

    // Line record offsets are relative to the data section at byte 16; the
    // records themselves sit right after the section length word.
    let section = &data[DATA_OFFSET..];

    let mut records = Vec::with_capacity(usize::from(header.line_count));
    for _ in 0..header.line_count {
        records.push(LineRecord {
            offset: cursor.read_i32::<LittleEndian>()?,
            length: cursor.read_u16::<LittleEndian>()?,
            flags: cursor.read_u16::<LittleEndian>()?,
        });
    }

    let mut file = TextFile::with_remap(config.clone(), remap_chars);
    for (index, record) in records.iter().enumerate() {
        let index = index as u16;
        let text = decrypt_line(section, index, record, config, remap_chars)?;
        file.push(TextLine {
            text,
            flags: record.flags,
        });
    }

    Ok(file)
}

fn decrypt_line(
    section: &[u8],
    index: u16,
    record: &LineRecord,
    config: &TextConfig,
    remap_chars: bool,
) -> Result<String> {
    let out_of_bounds = || Error::LineOutOfBounds {
        index,
        offset: record.offset,
        units: record.length,
    };

    let start = usize::try_from(record.offset).map_err(|_| out_of_bounds())?;
    let byte_length = usize::from(record.length) * 2;
    let end = start.checked_add(byte_length).ok_or_else(out_of_bounds)?;
    if end > section.len() {
        return Err(out_of_bounds());
    }

    let mut block = section[start..end].to_vec();
    crypt(&mut block, line_key(index));

    let units: Vec<u16> = block
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    decode_units(&units, config, remap_chars)
}

#[cfg(test)]
mod tests {
    use super::super::GameVersion;
    use super::*;

    /// Hand-assemble a file with the given encrypted line blocks.
    fn build_file(blocks: &[Vec<u8>]) -> Vec<u8> {
        let records_len = blocks.len() * 8;
        let mut data = Vec::new();
        let mut records = Vec::new();
        for block in blocks {
            records.push((4 + records_len + data.len(), block.len() / 2));
            data.extend_from_slice(block);
        }

        let total_length = (4 + records_len + data.len()) as u32;
        let mut out = Vec::new();
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&(blocks.len() as u16).to_le_bytes());
        out.extend_from_slice(&total_length.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&total_length.to_le_bytes());
        for (offset, units) in records {
            out.extend_from_slice(&(offset as i32).to_le_bytes());
            out.extend_from_slice(&(units as u16).to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes());
        }
        out.extend_from_slice(&data);
        out
    }

    fn encrypted_block(text: &str, index: u16) -> Vec<u8> {
        let mut block: Vec<u8> = text
            .encode_utf16()
            .chain([0u16])
            .flat_map(u16::to_le_bytes)
            .collect();
        crypt(&mut block, line_key(index));
        block
    }

    #[test]
    fn test_decode_single_line() {
        let bytes = build_file(&[encrypted_block("Hello", 0)]);
        let config = TextConfig::new(GameVersion::Any);
        let file = parse_text_bytes(&bytes, &config, false).unwrap();
        assert_eq!(file.len(), 1);
        assert_eq!(file.lines[0].text, "Hello");
        assert_eq!(file.lines[0].flags, 0);
    }

    #[test]
    fn test_decode_uses_per_line_keys() {
        let bytes = build_file(&[encrypted_block("First", 0), encrypted_block("Second", 1)]);
        let config = TextConfig::new(GameVersion::Any);
        let file = parse_text_bytes(&bytes, &config, false).unwrap();
        assert_eq!(file.lines[0].text, "First");
        assert_eq!(file.lines[1].text, "Second");
    }

    #[test]
    fn test_nonzero_initial_key_is_fatal() {
        let mut bytes = build_file(&[encrypted_block("Hello", 0)]);
        bytes[8] = 1;
        let config = TextConfig::new(GameVersion::Any);
        assert!(matches!(
            parse_text_bytes(&bytes, &config, false),
            Err(Error::InvalidInitialKey { key: 1 })
        ));
    }

    #[test]
    fn test_wrong_section_count_is_fatal() {
        let mut bytes = build_file(&[encrypted_block("Hello", 0)]);
        bytes[0] = 2;
        let config = TextConfig::new(GameVersion::Any);
        assert!(matches!(
            parse_text_bytes(&bytes, &config, false),
            Err(Error::InvalidSectionCount { count: 2 })
        ));
    }

    #[test]
    fn test_truncated_file_is_fatal() {
        let bytes = build_file(&[encrypted_block("Hello", 0)]);
        let config = TextConfig::new(GameVersion::Any);
        assert!(parse_text_bytes(&bytes[..bytes.len() - 1], &config, false).is_err());
    }

    #[test]
    fn test_section_length_mismatch_is_fatal() {
        let mut bytes = build_file(&[encrypted_block("Hello", 0)]);
        let bad = (u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]) + 1).to_le_bytes();
        bytes[16..20].copy_from_slice(&bad);
        let config = TextConfig::new(GameVersion::Any);
        assert!(matches!(
            parse_text_bytes(&bytes, &config, false),
            Err(Error::SectionLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_record_out_of_bounds_is_fatal() {
        let mut bytes = build_file(&[encrypted_block("Hello", 0)]);
        // Inflate the first record's unit length past the data section.
        bytes[24] = 0xFF;
        let config = TextConfig::new(GameVersion::Any);
        assert!(matches!(
            parse_text_bytes(&bytes, &config, false),
            Err(Error::LineOutOfBounds { index: 0, .. })
        ));
    }
}
