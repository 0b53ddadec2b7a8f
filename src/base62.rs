//! Base-62 rendering of accumulated values
//!
//! Tokens are written over the alphabet `[0-9a-zA-Z]`, in that order, most
//! significant symbol first and without padding. Zero is rendered as the
//! empty string, which the width sentinel guarantees a finished token never is.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use num_bigint::BigUint;

/// Ordered symbols of the token alphabet; the index of each symbol is its value
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const RADIX: u32 = 62;

lazy_static! {
    static ref SYMBOL_VALUES: HashMap<char, u8> = ALPHABET
        .iter()
        .enumerate()
        .map(|(ix, &sym)| (sym as char, ix as u8))
        .collect();
}

/// Error case for tokens containing a character outside of the alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCharacter {
    /// The offending character
    pub ch: char,
    /// Character (not byte) offset of `ch` within the token
    pub position: usize,
}

impl Display for InvalidCharacter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "illegal character `{}` at position {} in base-62 token",
            self.ch.escape_debug(),
            self.position
        )
    }
}

impl Error for InvalidCharacter {}

/// Renders `num` as a base-62 string
#[must_use]
pub fn encode(num: &BigUint) -> String {
    if num.bits() == 0 {
        return String::new();
    }
    num.to_radix_be(RADIX)
        .into_iter()
        .map(|d| ALPHABET[d as usize] as char)
        .collect()
}

/// Parses a base-62 string back into the value it renders
///
/// The empty string parses as zero. Leading `0` symbols are accepted and
/// carry no value, so `"001"` parses the same as `"1"`; [`encode`] never
/// produces them.
pub fn decode(token: &str) -> Result<BigUint, InvalidCharacter> {
    let digits = token
        .chars()
        .enumerate()
        .map(|(position, ch)| {
            SYMBOL_VALUES
                .get(&ch)
                .copied()
                .ok_or(InvalidCharacter { ch, position })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    if digits.is_empty() {
        return Ok(BigUint::from(0u8));
    }
    // every digit is drawn from the alphabet, so none can exceed the radix
    Ok(BigUint::from_radix_be(&digits, RADIX).unwrap_or_default())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn small_values() {
        assert_eq!(encode(&BigUint::from(0u8)), "");
        assert_eq!(encode(&BigUint::from(1u8)), "1");
        assert_eq!(encode(&BigUint::from(61u8)), "Z");
        assert_eq!(encode(&BigUint::from(62u8)), "10");
        assert_eq!(encode(&BigUint::from(3843u16)), "ZZ");
    }

    #[test]
    fn decode_inverts_encode() {
        let big = BigUint::parse_bytes(b"123456789012345678901234567890123456789", 10).unwrap();
        assert_eq!(decode(&encode(&big)), Ok(big));
        assert_eq!(decode(""), Ok(BigUint::from(0u8)));
        assert_eq!(decode("aZ"), Ok(BigUint::from(10u32 * 62 + 61)));
    }

    #[test]
    fn leading_zero_symbols() {
        assert_eq!(decode("00aZ"), decode("aZ"));
        assert_eq!(decode("000"), Ok(BigUint::from(0u8)));
        assert_eq!(encode(&decode("0aZ").unwrap()), "aZ");
    }

    #[test]
    fn illegal_characters() {
        assert_eq!(
            decode("ab-c"),
            Err(InvalidCharacter {
                ch: '-',
                position: 2
            })
        );
        assert_eq!(
            decode("é"),
            Err(InvalidCharacter {
                ch: 'é',
                position: 0
            })
        );
    }
}
