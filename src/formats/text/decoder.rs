//! Grammar decode: decrypted code units to escaped text
//!
//! Scans a line's 16-bit code units left to right, rendering literal
//! characters directly and control sequences as bracketed escapes. Ruby
//! annotations recurse into this same routine over length-bounded subslices.

use super::charmap::unmap_char;
use super::config::TextConfig;
use super::{TERMINATOR, TEXT_CLEAR, TEXT_NULL, TEXT_RETURN, TEXT_RUBY, TEXT_WAIT, VARIABLE_MARKER};
use crate::error::{Error, Result};

/// Decode one line's decrypted code units into escaped text.
pub(crate) fn decode_units(units: &[u16], config: &TextConfig, remap: bool) -> Result<String> {
    let mut out = String::new();
    decode_into(units, config, remap, &mut out)?;
    Ok(out)
}

fn decode_into(mut units: &[u16], config: &TextConfig, remap: bool, out: &mut String) -> Result<()> {
    while let Some((&value, rest)) = units.split_first() {
        units = rest;
        match value {
            VARIABLE_MARKER => decode_variable(&mut units, config, remap, out)?,
            TERMINATOR => return Ok(()),
            0x000A => out.push_str("\\n"),
            0x005C => out.push_str("\\\\"),
            0x005B => out.push_str("\\["),
            0x007B => out.push_str("\\{"),
            _ => push_unit(unmap_char(value, remap), &mut units, out),
        }
    }
    Ok(())
}

/// Append one UTF-16 unit as a character, pairing surrogates when the data
/// carries a supplementary-plane character as two units.
fn push_unit(value: u16, units: &mut &[u16], out: &mut String) {
    if (0xD800..=0xDBFF).contains(&value) {
        if let Some((&low, rest)) = units.split_first() {
            if (0xDC00..=0xDFFF).contains(&low) {
                *units = rest;
                let combined =
                    0x10000 + ((u32::from(value) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                return;
            }
        }
    }
    out.push(char::from_u32(u32::from(value)).unwrap_or(char::REPLACEMENT_CHARACTER));
}

fn decode_variable(
    units: &mut &[u16],
    config: &TextConfig,
    remap: bool,
    out: &mut String,
) -> Result<()> {
    let count = split_first(units)?;
    let opcode = split_first(units)?;

    match opcode {
        TEXT_RETURN => {
            out.push_str("\\r");
            return Ok(());
        }
        TEXT_CLEAR => {
            out.push_str("\\c");
            return Ok(());
        }
        TEXT_WAIT => {
            let time = split_first(units)?;
            out.push_str(&format!("[WAIT {time}]"));
            return Ok(());
        }
        TEXT_NULL => {
            let line = split_first(units)?;
            out.push_str(&format!("[~ {line}]"));
            return Ok(());
        }
        TEXT_RUBY => {
            let base_length = usize::from(split_first(units)?);
            let ruby_length = usize::from(split_first(units)?);
            let base1 = split_chunk(units, base_length)?;
            let ruby = split_chunk(units, ruby_length)?;
            let base2 = split_chunk(units, base_length)?;

            out.push('{');
            decode_into(base1, config, remap, out)?;
            out.push('|');
            decode_into(ruby, config, remap, out)?;
            if base1 != base2 {
                // The third span should duplicate the first; hand-authored
                // data sometimes diverges, and the divergence is preserved.
                out.push('|');
                decode_into(base2, config, remap, out)?;
            }
            out.push('}');
            return Ok(());
        }
        _ => {}
    }

    let name = config.variable_name(opcode);
    out.push_str("[VAR ");
    out.push_str(&name);
    if count > 1 {
        out.push('(');
        for arg_index in 1..count {
            let arg = split_first(units)?;
            out.push_str(&format!("{arg:04X}"));
            if arg_index + 1 < count {
                out.push(',');
            }
        }
        out.push(')');
    }
    out.push(']');
    Ok(())
}

fn split_first(units: &mut &[u16]) -> Result<u16> {
    let (&value, rest) = units.split_first().ok_or(Error::UnexpectedEndOfLine)?;
    *units = rest;
    Ok(value)
}

fn split_chunk<'a>(units: &mut &'a [u16], count: usize) -> Result<&'a [u16]> {
    if units.len() < count {
        return Err(Error::UnexpectedEndOfLine);
    }
    let (chunk, rest) = units.split_at(count);
    *units = rest;
    Ok(chunk)
}

#[cfg(test)]
mod tests {
    use super::super::GameVersion;
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(units: &[u16]) -> String {
        decode_units(units, &TextConfig::new(GameVersion::Any), false).unwrap()
    }

    #[test]
    fn test_plain_text() {
        let units: Vec<u16> = "Hello".encode_utf16().chain([TERMINATOR]).collect();
        assert_eq!(decode(&units), "Hello");
    }

    #[test]
    fn test_terminator_stops_decoding() {
        let units = [0x0041, TERMINATOR, 0x0042];
        assert_eq!(decode(&units), "A");
    }

    #[test]
    fn test_escaped_characters() {
        assert_eq!(decode(&[0x000A, TERMINATOR]), "\\n");
        assert_eq!(decode(&[0x005C, TERMINATOR]), "\\\\");
        assert_eq!(decode(&[0x005B, TERMINATOR]), "\\[");
        assert_eq!(decode(&[0x007B, TERMINATOR]), "\\{");
    }

    #[test]
    fn test_return_and_clear() {
        assert_eq!(decode(&[VARIABLE_MARKER, 1, TEXT_RETURN, TERMINATOR]), "\\r");
        assert_eq!(decode(&[VARIABLE_MARKER, 1, TEXT_CLEAR, TERMINATOR]), "\\c");
    }

    #[test]
    fn test_wait_and_null() {
        assert_eq!(
            decode(&[VARIABLE_MARKER, 1, TEXT_WAIT, 30, TERMINATOR]),
            "[WAIT 30]"
        );
        assert_eq!(
            decode(&[VARIABLE_MARKER, 1, TEXT_NULL, 7, TERMINATOR]),
            "[~ 7]"
        );
    }

    #[test]
    fn test_named_variable_with_args() {
        let units = [VARIABLE_MARKER, 3, 0x010E, 0x0001, 0x00FF, TERMINATOR];
        assert_eq!(decode(&units), "[VAR SPEAKER(0001,00FF)]");
    }

    #[test]
    fn test_unmapped_variable_renders_hex() {
        let units = [VARIABLE_MARKER, 1, 0xABCD, TERMINATOR];
        assert_eq!(decode(&units), "[VAR ABCD]");
    }

    #[test]
    fn test_ruby_collapses_matching_base() {
        // {水|みず} with the duplicated base span
        let units = [
            VARIABLE_MARKER,
            6,
            TEXT_RUBY,
            1,
            2,
            0x6C34,
            0x307F,
            0x305A,
            0x6C34,
            TERMINATOR,
        ];
        assert_eq!(decode(&units), "{水|みず}");
    }

    #[test]
    fn test_ruby_preserves_divergent_base() {
        let units = [
            VARIABLE_MARKER,
            6,
            TEXT_RUBY,
            1,
            2,
            0x6C34,
            0x307F,
            0x305A,
            0x706B,
            TERMINATOR,
        ];
        assert_eq!(decode(&units), "{水|みず|火}");
    }

    #[test]
    fn test_remap_mode() {
        let units = [0xE08E, TERMINATOR];
        let decoded = decode_units(&units, &TextConfig::new(GameVersion::Any), true).unwrap();
        assert_eq!(decoded, "♂");
    }

    #[test]
    fn test_surrogate_pair() {
        // U+1F600 as its UTF-16 pair
        let units = [0xD83D, 0xDE00, TERMINATOR];
        assert_eq!(decode(&units), "\u{1F600}");
    }

    #[test]
    fn test_truncated_variable_is_an_error() {
        let result = decode_units(
            &[VARIABLE_MARKER, 1],
            &TextConfig::new(GameVersion::Any),
            false,
        );
        assert!(matches!(result, Err(Error::UnexpectedEndOfLine)));
    }

    #[test]
    fn test_truncated_ruby_is_an_error() {
        let result = decode_units(
            &[VARIABLE_MARKER, 6, TEXT_RUBY, 4, 2, 0x6C34],
            &TextConfig::new(GameVersion::Any),
            false,
        );
        assert!(matches!(result, Err(Error::UnexpectedEndOfLine)));
    }
}
