//! Grammar encode: escaped text to code units
//!
//! The inverse of [`super::decoder`]: parses the bracketed escape form back
//! into a terminator-capped stream of 16-bit code units. All structural
//! problems in the text (unmatched brackets, unknown commands, bad escapes)
//! are hard errors; nothing is silently dropped.

use super::charmap::remap_char;
use super::config::TextConfig;
use super::{TERMINATOR, TEXT_CLEAR, TEXT_NULL, TEXT_RETURN, TEXT_RUBY, TEXT_WAIT, VARIABLE_MARKER};
use crate::error::{Error, Result};

/// Encode one line of escaped text into its code units, terminator included.
///
/// The text is trimmed first. An empty line encodes as a `[~ <index>]`
/// null-text reference when substitution is enabled.
pub(crate) fn encode_line(
    text: &str,
    index: u16,
    config: &TextConfig,
    remap: bool,
    set_empty_text: bool,
) -> Result<Vec<u16>> {
    let trimmed = text.trim();
    let substituted;
    let mut rest = if trimmed.is_empty() && set_empty_text {
        substituted = format!("[~ {index}]");
        substituted.as_str()
    } else {
        trimmed
    };

    let mut units = Vec::with_capacity(rest.len() + 1);
    while let Some(ch) = rest.chars().next() {
        match ch {
            '[' => {
                let body = &rest[1..];
                let close = body.find(']').ok_or_else(|| Error::UnterminatedVariable {
                    text: trimmed.to_string(),
                })?;
                encode_variable(&body[..close], config, &mut units)?;
                rest = &body[close + 1..];
            }
            '{' => {
                let body = &rest[1..];
                let close = body.find('}').ok_or_else(|| Error::UnterminatedRuby {
                    text: trimmed.to_string(),
                })?;
                encode_ruby(&body[..close], remap, &mut units)?;
                rest = &body[close + 1..];
            }
            '\\' => {
                let escape = rest[1..]
                    .chars()
                    .next()
                    .ok_or(Error::InvalidEscape { escape: '\\' })?;
                encode_escape(escape, &mut units)?;
                rest = &rest[1 + escape.len_utf8()..];
            }
            _ => {
                push_char(ch, remap, &mut units);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    units.push(TERMINATOR);
    Ok(units)
}

/// Append a character's UTF-16 units, remapping special glyphs if enabled.
fn push_char(ch: char, remap: bool, units: &mut Vec<u16>) {
    let mut buf = [0u16; 2];
    for &unit in ch.encode_utf16(&mut buf).iter() {
        units.push(remap_char(unit, remap));
    }
}

fn encode_escape(escape: char, units: &mut Vec<u16>) -> Result<()> {
    match escape {
        'n' => units.push(0x000A),
        '\\' => units.push(0x005C),
        '[' => units.push(0x005B),
        '{' => units.push(0x007B),
        'r' => units.extend_from_slice(&[VARIABLE_MARKER, 1, TEXT_RETURN]),
        'c' => units.extend_from_slice(&[VARIABLE_MARKER, 1, TEXT_CLEAR]),
        _ => return Err(Error::InvalidEscape { escape }),
    }
    Ok(())
}

/// Encode the body of a `[...]` span: a command, a space, and its arguments.
fn encode_variable(body: &str, config: &TextConfig, units: &mut Vec<u16>) -> Result<()> {
    let (command, args) = body.split_once(' ').ok_or_else(|| Error::MalformedVariable {
        text: body.to_string(),
    })?;

    units.push(VARIABLE_MARKER);
    match command {
        "~" => {
            units.push(1);
            units.push(TEXT_NULL);
            units.push(parse_decimal(args)?);
        }
        "WAIT" => {
            units.push(1);
            units.push(TEXT_WAIT);
            units.push(parse_decimal(args)?);
        }
        "VAR" => encode_variable_parameters(args, config, units)?,
        _ => {
            return Err(Error::UnknownVariableMethod {
                text: body.to_string(),
            });
        }
    }
    Ok(())
}

/// Encode a `VAR` argument: `NAME` or `NAME(HHHH,HHHH,...)`.
fn encode_variable_parameters(args: &str, config: &TextConfig, units: &mut Vec<u16>) -> Result<()> {
    let (name, arg_list) = match args.split_once('(') {
        Some((name, rest)) => {
            let inner = rest.strip_suffix(')').ok_or_else(|| Error::MalformedVariable {
                text: args.to_string(),
            })?;
            (name, Some(inner))
        }
        None => (args, None),
    };

    let code = config.variable_code(name)?;
    match arg_list {
        None | Some("") => {
            units.push(1);
            units.push(code);
        }
        Some(list) => {
            let count_index = units.len();
            units.push(0); // patched once the arguments are counted
            units.push(code);
            let mut count: u16 = 1;
            for part in list.split(',') {
                let value =
                    u16::from_str_radix(part, 16).map_err(|_| Error::InvalidHexArgument {
                        value: part.to_string(),
                    })?;
                units.push(value);
                count += 1;
            }
            units[count_index] = count;
        }
    }
    Ok(())
}

/// Encode the body of a `{...}` span: `base|ruby` or `base1|ruby|base2`.
fn encode_ruby(body: &str, remap: bool, units: &mut Vec<u16>) -> Result<()> {
    let (base1, rest) = body.split_once('|').ok_or_else(|| Error::MalformedRuby {
        text: body.to_string(),
    })?;
    let (ruby, base2) = match rest.split_once('|') {
        Some((ruby, base2)) => (ruby, base2),
        None => (rest, base1),
    };

    let base1_units = utf16_units(base1, remap);
    let ruby_units = utf16_units(ruby, remap);
    let base2_units = utf16_units(base2, remap);
    if base1_units.len() != base2_units.len() {
        return Err(Error::RubyLengthMismatch {
            base1: base1.to_string(),
            base2: base2.to_string(),
        });
    }

    let count = u16::try_from(3 + base1_units.len() + ruby_units.len()).map_err(|_| {
        Error::MalformedRuby {
            text: body.to_string(),
        }
    })?;
    units.push(VARIABLE_MARKER);
    units.push(count);
    units.push(TEXT_RUBY);
    units.push(base1_units.len() as u16);
    units.push(ruby_units.len() as u16);
    units.extend_from_slice(&base1_units);
    units.extend_from_slice(&ruby_units);
    units.extend_from_slice(&base2_units);
    Ok(())
}

fn utf16_units(text: &str, remap: bool) -> Vec<u16> {
    text.encode_utf16().map(|unit| remap_char(unit, remap)).collect()
}

fn parse_decimal(args: &str) -> Result<u16> {
    args.parse().map_err(|_| Error::InvalidDecimalArgument {
        value: args.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::GameVersion;
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode(text: &str) -> Vec<u16> {
        encode_line(text, 0, &TextConfig::new(GameVersion::Any), false, true).unwrap()
    }

    fn encode_err(text: &str) -> Error {
        encode_line(text, 0, &TextConfig::new(GameVersion::Any), false, true).unwrap_err()
    }

    #[test]
    fn test_plain_text() {
        let expected: Vec<u16> = "Hello".encode_utf16().chain([TERMINATOR]).collect();
        assert_eq!(encode("Hello"), expected);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(encode("\\n"), vec![0x000A, TERMINATOR]);
        assert_eq!(encode("\\\\"), vec![0x005C, TERMINATOR]);
        assert_eq!(encode("\\["), vec![0x005B, TERMINATOR]);
        assert_eq!(encode("\\{"), vec![0x007B, TERMINATOR]);
        assert_eq!(
            encode("\\r"),
            vec![VARIABLE_MARKER, 1, TEXT_RETURN, TERMINATOR]
        );
        assert_eq!(
            encode("\\c"),
            vec![VARIABLE_MARKER, 1, TEXT_CLEAR, TERMINATOR]
        );
    }

    #[test]
    fn test_invalid_escape() {
        assert!(matches!(
            encode_err("\\q"),
            Error::InvalidEscape { escape: 'q' }
        ));
        assert!(matches!(encode_err("dangling\\"), Error::InvalidEscape { .. }));
    }

    #[test]
    fn test_wait_and_null() {
        assert_eq!(
            encode("[WAIT 30]"),
            vec![VARIABLE_MARKER, 1, TEXT_WAIT, 30, TERMINATOR]
        );
        assert_eq!(
            encode("[~ 12]"),
            vec![VARIABLE_MARKER, 1, TEXT_NULL, 12, TERMINATOR]
        );
    }

    #[test]
    fn test_variable_with_args() {
        assert_eq!(
            encode("[VAR SPEAKER(0001,00FF)]"),
            vec![VARIABLE_MARKER, 3, 0x010E, 0x0001, 0x00FF, TERMINATOR]
        );
    }

    #[test]
    fn test_variable_without_args() {
        assert_eq!(
            encode("[VAR TRNAME]"),
            vec![VARIABLE_MARKER, 1, 0x0100, TERMINATOR]
        );
        // Empty parentheses encode like no parentheses
        assert_eq!(encode("[VAR TRNAME()]"), encode("[VAR TRNAME]"));
    }

    #[test]
    fn test_variable_hex_fallback() {
        assert_eq!(
            encode("[VAR ABCD]"),
            vec![VARIABLE_MARKER, 1, 0xABCD, TERMINATOR]
        );
    }

    #[test]
    fn test_variable_errors() {
        assert!(matches!(
            encode_err("[VAR SPEAKER"),
            Error::UnterminatedVariable { .. }
        ));
        assert!(matches!(
            encode_err("[NOPE 1]"),
            Error::UnknownVariableMethod { .. }
        ));
        assert!(matches!(encode_err("[WAIT]"), Error::MalformedVariable { .. }));
        assert!(matches!(
            encode_err("[WAIT x]"),
            Error::InvalidDecimalArgument { .. }
        ));
        assert!(matches!(
            encode_err("[VAR SPEAKER(zz)]"),
            Error::InvalidHexArgument { .. }
        ));
        assert!(matches!(
            encode_err("[VAR NOT_A_VARIABLE]"),
            Error::UnknownVariable { .. }
        ));
    }

    #[test]
    fn test_ruby() {
        assert_eq!(
            encode("{水|みず}"),
            vec![
                VARIABLE_MARKER,
                6,
                TEXT_RUBY,
                1,
                2,
                0x6C34,
                0x307F,
                0x305A,
                0x6C34,
                TERMINATOR
            ]
        );
    }

    #[test]
    fn test_ruby_with_explicit_base2() {
        assert_eq!(
            encode("{水|みず|火}"),
            vec![
                VARIABLE_MARKER,
                6,
                TEXT_RUBY,
                1,
                2,
                0x6C34,
                0x307F,
                0x305A,
                0x706B,
                TERMINATOR
            ]
        );
    }

    #[test]
    fn test_ruby_errors() {
        assert!(matches!(encode_err("{水"), Error::UnterminatedRuby { .. }));
        assert!(matches!(encode_err("{水みず}"), Error::MalformedRuby { .. }));
        assert!(matches!(
            encode_err("{水|みず|火山}"),
            Error::RubyLengthMismatch { .. }
        ));
    }

    #[test]
    fn test_empty_line_substitution() {
        assert_eq!(
            encode_line("", 7, &TextConfig::new(GameVersion::Any), false, true).unwrap(),
            vec![VARIABLE_MARKER, 1, TEXT_NULL, 7, TERMINATOR]
        );
        assert_eq!(
            encode_line("   ", 7, &TextConfig::new(GameVersion::Any), false, true).unwrap(),
            encode("[~ 7]")
        );
        // Substitution disabled leaves just the terminator
        assert_eq!(
            encode_line("", 7, &TextConfig::new(GameVersion::Any), false, false).unwrap(),
            vec![TERMINATOR]
        );
    }

    #[test]
    fn test_remap_mode() {
        assert_eq!(
            encode_line("♂", 0, &TextConfig::new(GameVersion::Any), true, true).unwrap(),
            vec![0xE08E, TERMINATOR]
        );
    }

    #[test]
    fn test_surrogate_pair() {
        assert_eq!(encode("\u{1F600}"), vec![0xD83D, 0xDE00, TERMINATOR]);
    }

    #[test]
    fn test_text_is_trimmed() {
        assert_eq!(encode("  Hello  "), encode("Hello"));
    }
}
