//! Per-line keystream cipher
//!
//! Every line is XORed against a keystream seeded from its line index. The
//! key advances by a 3-bit left rotation per code unit, so the stream
//! depends only on position and the transform is its own inverse.

/// Keystream seed for line index 0.
pub const KEY_BASE: u16 = 0x7C89;

/// Per-line seed increment.
pub const KEY_ADVANCE: u16 = 0x2983;

/// Keystream seed for the line at `index` (16-bit wraparound arithmetic).
#[must_use]
pub fn line_key(index: u16) -> u16 {
    KEY_BASE.wrapping_add(index.wrapping_mul(KEY_ADVANCE))
}

/// XOR `data` against the keystream starting at `key`, in place.
///
/// `data` is interpreted as little-endian 16-bit code units regardless of
/// host byte order. Applying the same call twice restores the original
/// bytes.
pub fn crypt(data: &mut [u8], mut key: u16) {
    for unit in data.chunks_exact_mut(2) {
        let value = u16::from_le_bytes([unit[0], unit[1]]) ^ key;
        unit.copy_from_slice(&value.to_le_bytes());
        key = key.rotate_left(3);
    }
}
