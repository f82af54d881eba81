//! AHTB table reading and parsing

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{AHTB_SIGNATURE, AhtbEntry, AhtbTable};
use crate::error::{Error, Result};
use crate::utils::hash::fnv1a_64;

/// Read an AHTB table from disk
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be opened or read, and any of
/// the [`parse_ahtb_bytes`] errors for invalid contents.
pub fn read_ahtb<P: AsRef<Path>>(path: P) -> Result<AhtbTable> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_ahtb_bytes(&buffer)
}

/// Parse AHTB table data from bytes
///
/// Every entry's stored hash is recomputed from its decoded name; a
/// mismatch signals corrupt or foreign input and is fatal.
///
/// # Errors
/// Returns [`Error::InvalidAhtbMagic`] for a wrong signature,
/// [`Error::HashMismatch`] for a bad entry hash, [`Error::Utf8Error`] for
/// non-UTF-8 names, and [`Error::Io`] for truncated data.
pub fn parse_ahtb_bytes(data: &[u8]) -> Result<AhtbTable> {
    let mut cursor = Cursor::new(data);

    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if u32::from_le_bytes(magic) != AHTB_SIGNATURE {
        return Err(Error::InvalidAhtbMagic(magic));
    }

    let count = cursor.read_u32::<LittleEndian>()? as usize;
    let mut table = AhtbTable::new();
    table.entries.reserve(count);
    for _ in 0..count {
        table.entries.push(read_entry(&mut cursor)?);
    }

    Ok(table)
}

fn read_entry(cursor: &mut Cursor<&[u8]>) -> Result<AhtbEntry> {
    let stored = cursor.read_u64::<LittleEndian>()?;
    let name_length = cursor.read_u16::<LittleEndian>()? as usize;

    let mut name_bytes = vec![0u8; name_length];
    cursor.read_exact(&mut name_bytes)?;
    cursor.read_u8()?; // \0 terminator

    let name = String::from_utf8(name_bytes)?;
    let computed = fnv1a_64(&name);
    if stored != computed {
        return Err(Error::HashMismatch {
            name,
            stored,
            computed,
        });
    }

    Ok(AhtbEntry { name })
}

#[cfg(test)]
mod tests {
    use super::super::writer::ahtb_to_bytes;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip() {
        let table = AhtbTable::for_keys(["msg_dialog_000", "msg_dialog_001", "msg_dialog_max"]);
        let bytes = ahtb_to_bytes(&table).unwrap();
        let parsed = parse_ahtb_bytes(&bytes).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_bad_magic() {
        let bytes = [0u8; 8];
        assert!(matches!(
            parse_ahtb_bytes(&bytes),
            Err(Error::InvalidAhtbMagic(_))
        ));
    }

    #[test]
    fn test_hash_mismatch_is_fatal() {
        let table = AhtbTable::for_keys(["msg_dialog_000"]);
        let mut bytes = ahtb_to_bytes(&table).unwrap();
        bytes[8] ^= 0xFF; // corrupt the stored hash
        assert!(matches!(
            parse_ahtb_bytes(&bytes),
            Err(Error::HashMismatch { .. })
        ));
    }

    #[test]
    fn test_truncated_entry_is_fatal() {
        let table = AhtbTable::for_keys(["msg_dialog_000"]);
        let bytes = ahtb_to_bytes(&table).unwrap();
        assert!(parse_ahtb_bytes(&bytes[..bytes.len() - 2]).is_err());
    }
}
