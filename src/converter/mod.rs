//! File-level conversion between `.dat` string tables and editable tables
//!
//! A `.dat` file may be accompanied by a sibling `.tbl` AHTB table naming
//! its lines; when present, the names become the Key column of the exported
//! table. The AHTB is expected to hold one entry per line plus the trailing
//! `msg_<stem>_max` terminator key; a table that disagrees is logged and
//! ignored rather than failing the file, since key labels are cosmetic.

use std::path::Path;

use crate::error::Result;
use crate::formats::ahtb::{AhtbTable, read_ahtb};
use crate::formats::text::{
    ExportFormat, TextConfig, export_table, import_table, read_text, write_text,
};

/// Convert a `.dat` file to an editable table file
///
/// Returns the number of exported lines.
///
/// # Errors
/// Returns an error if reading, decoding, or writing fails.
pub fn convert_dat_to_table<P: AsRef<Path>>(
    source: P,
    dest: P,
    config: &TextConfig,
    format: ExportFormat,
    remap_chars: bool,
) -> Result<usize> {
    let source = source.as_ref();
    tracing::info!("Converting DAT to table: {:?} -> {:?}", source, dest.as_ref());

    let file = read_text(source, config, remap_chars)?;
    let keys = sibling_keys(source, file.len())?;

    export_table(&file, keys.as_deref(), dest, format)
}

/// Convert an editable table file back to a `.dat` file
///
/// Returns the number of imported lines.
///
/// # Errors
/// Returns an error if reading, encoding, or writing fails.
pub fn convert_table_to_dat<P: AsRef<Path>>(
    source: P,
    dest: P,
    config: &TextConfig,
    format: ExportFormat,
    remap_chars: bool,
) -> Result<usize> {
    let source = source.as_ref();
    tracing::info!("Converting table to DAT: {:?} -> {:?}", source, dest.as_ref());

    let file = import_table(source, config, format, remap_chars)?;
    write_text(dest, &file)?;
    Ok(file.len())
}

/// Load line key names from a sibling `.tbl` AHTB table, if one exists and
/// matches the file.
fn sibling_keys(source: &Path, line_count: usize) -> Result<Option<Vec<String>>> {
    let table_path = source.with_extension("tbl");
    if !table_path.is_file() {
        return Ok(None);
    }

    let table = read_ahtb(&table_path)?;
    let keys = table.keys();

    if keys.len() != line_count + 1 {
        tracing::warn!(
            "{:?}: AHTB has {} keys for {} lines (expected lines + 1); ignoring keys",
            table_path,
            keys.len(),
            line_count
        );
        return Ok(None);
    }

    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let expected = AhtbTable::terminator_key(&stem);
    if keys.last().is_some_and(|last| *last != expected) {
        tracing::warn!(
            "{:?}: AHTB terminator key {:?} does not match {:?}; ignoring keys",
            table_path,
            keys.last(),
            expected
        );
        return Ok(None);
    }

    Ok(Some(keys))
}
