//! Base-91 numbers as used by compressed positions, Mic-E altitude, comment
//! telemetry and DAO.
//!
//! Each character carries `byte - 33`, most significant character first.

use crate::error::DecodeError;

const RADIX: u64 = 91;
const OFFSET: u8 = 33;

/// Decode a base-91 string. Leading `!` (zero) characters are insignificant
/// and an empty string decodes to zero.
pub fn decode(text: &str) -> Result<u64, DecodeError> {
    let mut value: u64 = 0;

    for c in text.trim_start_matches('!').chars() {
        // Valid symbols are 0x21..0x7b
        if !('\x21'..'\x7c').contains(&c) {
            return Err(DecodeError::InvalidBase91Character(c));
        }
        value = value
            .saturating_mul(RADIX)
            .saturating_add(u64::from(c as u8 - OFFSET));
    }

    Ok(value)
}

/// Encode `number` in base-91, left-padded with `!` to at least `width`
/// characters (and never shorter than one character).
pub fn encode(number: u64, width: usize) -> String {
    let mut digits = Vec::new();
    let mut remaining = number;

    while remaining > 0 {
        digits.push((remaining % RADIX) as u8 + OFFSET);
        remaining /= RADIX;
    }

    let width = width.max(1);
    while digits.len() < width {
        digits.push(OFFSET);
    }

    digits.iter().rev().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode("").unwrap(), 0);
        assert_eq!(decode("!").unwrap(), 0);
        assert_eq!(decode("\"").unwrap(), 1);
        assert_eq!(decode("{").unwrap(), 90);
        assert_eq!(decode("\"!").unwrap(), 91);
        assert_eq!(decode("!!\"!").unwrap(), 91);
        assert_eq!(decode("5L!!").unwrap(), 20 * 91 * 91 * 91 + 43 * 91 * 91);
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        assert_eq!(decode("a b"), Err(DecodeError::InvalidBase91Character(' ')));
        assert_eq!(decode("|"), Err(DecodeError::InvalidBase91Character('|')));
        assert_eq!(decode("ab~"), Err(DecodeError::InvalidBase91Character('~')));
    }

    #[test]
    fn test_encode_pads_to_width() {
        assert_eq!(encode(0, 0), "!");
        assert_eq!(encode(0, 4), "!!!!");
        assert_eq!(encode(90, 1), "{");
        assert_eq!(encode(91, 1), "\"!");
        assert_eq!(encode(91, 4), "!!\"!");
    }

    #[test]
    fn test_round_trip() {
        for n in [0u64, 1, 90, 91, 8280, 753570, 68574960, 4_294_967_295] {
            for width in 0..6 {
                assert_eq!(decode(&encode(n, width)).unwrap(), n, "n={n} width={width}");
            }
        }
    }
}
