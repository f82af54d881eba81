//! `.dat` string-table writing

#![allow(clippy::cast_possible_truncation)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::cipher::{crypt, line_key};
use super::encoder::encode_line;
use super::{DATA_OFFSET, HEADER_SIZE, LINE_RECORD_SIZE, LineRecord, TextFile, TextHeader};
use crate::error::{Error, Result};

/// Write a .dat string table to disk
///
/// # Errors
/// Returns an error if encoding fails or the file cannot be written.
pub fn write_text<P: AsRef<Path>>(path: P, file: &TextFile) -> Result<()> {
    let bytes = text_to_bytes(file)?;
    let out = File::create(path)?;
    let mut writer = BufWriter::new(out);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Serialize a [`TextFile`] to .dat bytes
///
/// Lines are grammar-encoded, encrypted with their per-line key, and laid
/// out sequentially with 4-byte alignment padding; the record table and
/// header are composed afterwards, once the total length is known.
///
/// # Errors
/// Returns a grammar error if any line's text fails to encode, and
/// [`Error::TooManyLines`] past the 16-bit line count.
pub fn text_to_bytes(file: &TextFile) -> Result<Vec<u8>> {
    let line_count =
        u16::try_from(file.lines.len()).map_err(|_| Error::TooManyLines {
            count: file.lines.len(),
        })?;
    let data_start = HEADER_SIZE + usize::from(line_count) * LINE_RECORD_SIZE;

    let mut records = Vec::with_capacity(file.lines.len());
    let mut data = Vec::new();
    for (index, line) in file.lines.iter().enumerate() {
        let index = index as u16;
        let units = encode_line(
            &line.text,
            index,
            file.config(),
            file.remap_chars(),
            file.empty_line_substitution(),
        )?;

        let mut block: Vec<u8> = units.iter().flat_map(|unit| unit.to_le_bytes()).collect();
        crypt(&mut block, line_key(index));

        records.push(LineRecord {
            offset: (data_start - DATA_OFFSET + data.len()) as i32,
            length: (block.len() / 2) as u16,
            flags: line.flags,
        });
        data.extend_from_slice(&block);
        if block.len() % 4 == 2 {
            // keep the next line 4-byte aligned
            data.extend_from_slice(&[0, 0]);
        }
    }

    let file_length = data_start + data.len();
    let header = TextHeader::new(line_count, (file_length - DATA_OFFSET) as u32);
    header.validate(file_length as u64)?;

    let mut out = Vec::with_capacity(file_length);
    out.write_u16::<LittleEndian>(header.sections)?;
    out.write_u16::<LittleEndian>(header.line_count)?;
    out.write_u32::<LittleEndian>(header.total_length)?;
    out.write_u32::<LittleEndian>(header.initial_key)?;
    out.write_u32::<LittleEndian>(header.data_offset)?;
    out.write_u32::<LittleEndian>(header.section_length)?;
    for record in &records {
        out.write_i32::<LittleEndian>(record.offset)?;
        out.write_u16::<LittleEndian>(record.length)?;
        out.write_u16::<LittleEndian>(record.flags)?;
    }
    out.extend_from_slice(&data);
    Ok(out)
}
