//! AHTB table writing

#![allow(clippy::cast_possible_truncation)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::{AHTB_SIGNATURE, AhtbTable};
use crate::error::Result;

/// Write an AHTB table to disk
///
/// # Errors
/// Returns an error if file writing fails.
pub fn write_ahtb<P: AsRef<Path>>(path: P, table: &AhtbTable) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&ahtb_to_bytes(table)?)?;
    writer.flush()?;
    Ok(())
}

/// Serialize an AHTB table to bytes
///
/// Hashes are always recomputed from the names; the name length excludes
/// the zero byte that follows every name.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn ahtb_to_bytes(table: &AhtbTable) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(AHTB_SIGNATURE)?;
    out.write_u32::<LittleEndian>(table.entries.len() as u32)?;

    for entry in &table.entries {
        let name_bytes = entry.name.as_bytes();
        out.write_u64::<LittleEndian>(entry.hash())?;
        out.write_u16::<LittleEndian>(name_bytes.len() as u16)?;
        out.extend_from_slice(name_bytes);
        out.push(0); // \0 terminator
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hash::fnv1a_64;

    #[test]
    fn test_layout() {
        let table = AhtbTable::for_keys(["ab"]);
        let bytes = ahtb_to_bytes(&table).unwrap();

        assert_eq!(&bytes[0..4], b"AHTB");
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 1);
        let hash = u64::from_le_bytes(bytes[8..16].try_into().unwrap());
        assert_eq!(hash, fnv1a_64("ab"));
        assert_eq!(u16::from_le_bytes([bytes[16], bytes[17]]), 2);
        assert_eq!(&bytes[18..20], b"ab");
        assert_eq!(bytes[20], 0);
        assert_eq!(bytes.len(), 21);
    }
}
