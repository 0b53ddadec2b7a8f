//! Decode-side accumulator state

use std::error::Error;
use std::fmt::{Display, Formatter};

use num_bigint::BigUint;
use num_integer::Integer;

use super::{fold_checksum, Digit};

/// Error returned by [`Unpacker::pop_digit`] when the accumulator has already
/// been drained to zero.
///
/// Since a well-formed token always leaves the sentinel residue of one in
/// place until the very end, reaching zero means the input was truncated or
/// built against a different schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted;

impl Display for Exhausted {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ran out of accumulated value")
    }
}

impl Error for Exhausted {}

/// Decode-side state of the mixed-radix engine
///
/// Digits are removed from the lowest place value upwards, in the same order
/// that they were pushed onto the corresponding [`Packer`](super::Packer).
#[derive(Debug, Clone)]
pub struct Unpacker {
    accumulator: BigUint,
    checksum: u8,
}

impl Unpacker {
    /// Wraps an accumulated value for digit-by-digit consumption
    #[must_use]
    pub fn new(accumulator: BigUint) -> Self {
        Self {
            accumulator,
            checksum: 0,
        }
    }

    /// Removes the lowest-place digit, interpreted in radix `radix`
    ///
    /// Fails with [`Exhausted`] if the accumulator is already zero, in which
    /// case neither the accumulator nor the checksum are modified.
    pub fn pop_digit(&mut self, radix: Digit) -> Result<Digit, Exhausted> {
        if self.accumulator.bits() == 0 {
            return Err(Exhausted);
        }
        let (quot, rem) = self.accumulator.div_rem(&BigUint::from(radix));
        // `rem < radix`, so it is at most a single 32-bit word
        let value: Digit = rem.iter_u32_digits().next().unwrap_or(0);
        self.accumulator = quot;
        self.checksum = fold_checksum(self.checksum, value);
        tracing::trace!(value, radix, "popped digit");
        Ok(value)
    }

    /// Removes `count` consecutive base-256 digits as raw bytes
    pub fn pop_bytes(&mut self, count: usize) -> Result<Vec<u8>, Exhausted> {
        // `count` comes from the token, so never reserve more than it can hold
        let available = usize::try_from(self.accumulator.bits() / 8 + 1).unwrap_or(usize::MAX);
        let mut ret = Vec::with_capacity(count.min(available));
        for _ in 0..count {
            // radix 256 guarantees the digit fits in a byte
            ret.push(self.pop_digit(super::BYTE_RADIX)? as u8);
        }
        Ok(ret)
    }

    /// Returns the checksum of every digit popped so far
    #[must_use]
    #[inline]
    pub const fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Returns a reference to the value that has not yet been consumed
    #[must_use]
    #[inline]
    pub const fn residual(&self) -> &BigUint {
        &self.accumulator
    }

    /// Returns `true` if all that remains is the width sentinel
    #[must_use]
    pub fn is_residual_one(&self) -> bool {
        self.accumulator == BigUint::from(1u8)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exhausted_on_zero() {
        let mut u = Unpacker::new(BigUint::from(0u8));
        assert_eq!(u.pop_digit(2), Err(Exhausted));
        assert_eq!(u.checksum(), 0);
    }

    #[test]
    fn pops_lowest_first() {
        // 27 = 1 + 3 * 2 + 1 * 20
        let mut u = Unpacker::new(BigUint::from(27u8));
        assert_eq!(u.pop_digit(2), Ok(1));
        assert_eq!(u.pop_digit(10), Ok(3));
        assert_eq!(u.checksum(), 4);
        assert!(u.is_residual_one());
        assert_eq!(u.pop_digit(1), Ok(0));
    }

    #[test]
    fn pop_bytes_stops_when_drained() {
        let mut u = Unpacker::new(BigUint::from(0x0141u32));
        assert_eq!(u.pop_bytes(2), Ok(vec![0x41, 0x01]));
        assert_eq!(u.pop_bytes(1), Err(Exhausted));
    }

    #[test]
    fn pop_bytes_with_huge_count() {
        let mut u = Unpacker::new(BigUint::from(0x41u8));
        assert_eq!(u.pop_bytes(usize::MAX), Err(Exhausted));
        assert_eq!(u.checksum(), 0x41);
    }
}
