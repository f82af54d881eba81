//! Version-specific variable tables
//!
//! Variable opcodes embedded in line data are rendered by name in the
//! escaped text form. The mapping differs between game versions, so a
//! [`TextConfig`] is built once from a [`GameVersion`] selector (or loaded
//! from JSON for projects with their own opcode maps) and is read-only
//! thereafter. Codes with no table entry fall back to 4-digit uppercase hex
//! in both directions.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Which game's variable table to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameVersion {
    /// The shared base table only.
    #[default]
    Any,
    /// Sword/Shield.
    SwSh,
    /// Legends: Arceus.
    La,
    /// Scarlet/Violet.
    Sv,
}

impl GameVersion {
    /// Parse a version selector from its CLI spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Some(Self::Any),
            "swsh" => Some(Self::SwSh),
            "la" => Some(Self::La),
            "sv" => Some(Self::Sv),
            _ => None,
        }
    }
}

/// Variable codes shared by every supported version.
const BASE_VARIABLES: &[(u16, &str)] = &[
    (0x0100, "TRNAME"),
    (0x0101, "PKNAME"),
    (0x0102, "PKNICK"),
    (0x0103, "TYPE"),
    (0x0105, "LOCATION"),
    (0x0106, "ABILITY"),
    (0x0107, "MOVE"),
    (0x0108, "ITEM1"),
    (0x0109, "ITEM2"),
    (0x010B, "BOX"),
    (0x010E, "SPEAKER"),
    (0x0110, "STRVAR1"),
    (0x0111, "STRVAR2"),
    (0x0127, "NUM1"),
    (0x0128, "NUM2"),
    (0x0129, "NUM3"),
    (0xFF00, "COLOR"),
];

/// Additions for Sword/Shield.
const SWSH_VARIABLES: &[(u16, &str)] = &[(0x0119, "DYNAMAX"), (0x011A, "CURRYNAME")];

/// Additions for Legends: Arceus.
const LA_VARIABLES: &[(u16, &str)] = &[(0x011E, "SATCHEL"), (0x011F, "RANK")];

/// Additions for Scarlet/Violet.
const SV_VARIABLES: &[(u16, &str)] = &[(0x0120, "TERATYPE"), (0x0121, "SANDWICH")];

/// One entry of a JSON-defined variable table.
#[derive(Debug, Deserialize)]
struct VariableDef {
    /// Opcode as a hexadecimal string, e.g. `"010E"`.
    code: String,
    /// Human-readable name, e.g. `"SPEAKER"`.
    name: String,
}

/// Read-only mapping between variable opcodes and their human names.
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    variables: IndexMap<u16, String>,
}

impl TextConfig {
    /// Build the table for a game version.
    #[must_use]
    pub fn new(version: GameVersion) -> Self {
        let extra = match version {
            GameVersion::Any => &[][..],
            GameVersion::SwSh => SWSH_VARIABLES,
            GameVersion::La => LA_VARIABLES,
            GameVersion::Sv => SV_VARIABLES,
        };
        let variables = BASE_VARIABLES
            .iter()
            .chain(extra)
            .map(|(code, name)| (*code, (*name).to_string()))
            .collect();
        Self { variables }
    }

    /// Load a custom table from a JSON array of `{"code", "name"}` objects.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse a custom table from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let defs: Vec<VariableDef> = serde_json::from_str(json)?;
        let mut variables = IndexMap::with_capacity(defs.len());
        for def in defs {
            let code = parse_hex_code(&def.code).ok_or_else(|| Error::UnknownVariable {
                name: def.code.clone(),
            })?;
            variables.insert(code, def.name);
        }
        Ok(Self { variables })
    }

    /// The human-friendly name for a variable opcode, falling back to
    /// 4-digit uppercase hex for unmapped codes.
    #[must_use]
    pub fn variable_name(&self, code: u16) -> String {
        self.variables
            .get(&code)
            .cloned()
            .unwrap_or_else(|| format!("{code:04X}"))
    }

    /// The machine opcode for a variable name, falling back to hexadecimal
    /// parsing (with an optional `0x` prefix) for names not in the table.
    pub fn variable_code(&self, name: &str) -> Result<u16> {
        if let Some((code, _)) = self.variables.iter().find(|(_, n)| n.as_str() == name) {
            return Ok(*code);
        }
        parse_hex_code(name).ok_or_else(|| Error::UnknownVariable {
            name: name.to_string(),
        })
    }

    /// Iterate the table entries in definition order.
    pub fn variables(&self) -> impl Iterator<Item = (u16, &str)> {
        self.variables.iter().map(|(code, name)| (*code, name.as_str()))
    }
}

fn parse_hex_code(s: &str) -> Option<u16> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u16::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup() {
        let config = TextConfig::new(GameVersion::Any);
        assert_eq!(config.variable_name(0x010E), "SPEAKER");
        assert_eq!(config.variable_name(0xABCD), "ABCD");
    }

    #[test]
    fn test_code_lookup_with_hex_fallback() {
        let config = TextConfig::new(GameVersion::Any);
        assert_eq!(config.variable_code("SPEAKER").unwrap(), 0x010E);
        assert_eq!(config.variable_code("ABCD").unwrap(), 0xABCD);
        assert_eq!(config.variable_code("0x010E").unwrap(), 0x010E);
        assert!(matches!(
            config.variable_code("NOT_A_VARIABLE"),
            Err(Error::UnknownVariable { .. })
        ));
    }

    #[test]
    fn test_hex_fallback_round_trip() {
        // An unmapped code renders as hex, and that hex resolves back.
        let config = TextConfig::new(GameVersion::Any);
        let name = config.variable_name(0x0BEE);
        assert_eq!(config.variable_code(&name).unwrap(), 0x0BEE);
    }

    #[test]
    fn test_version_additions() {
        let any = TextConfig::new(GameVersion::Any);
        let sv = TextConfig::new(GameVersion::Sv);
        assert!(any.variable_code("TERATYPE").is_err());
        assert_eq!(sv.variable_code("TERATYPE").unwrap(), 0x0120);
        assert_eq!(sv.variable_code("SPEAKER").unwrap(), 0x010E);
    }

    #[test]
    fn test_from_json() {
        let config =
            TextConfig::from_json(r#"[{"code": "0200", "name": "BADGE"}]"#).unwrap();
        assert_eq!(config.variable_code("BADGE").unwrap(), 0x0200);
        assert_eq!(config.variable_name(0x0200), "BADGE");
    }
}
