//! Encode-side accumulator state

use num_bigint::BigUint;

use super::{fold_checksum, Digit};

/// Encode-side state of the mixed-radix engine
///
/// A `Packer` holds the accumulated value, the place value (`factor`) that
/// the next pushed digit will be multiplied by, and the running checksum of
/// every digit pushed so far.
///
/// Pushing a digit `v` in radix `r` adds `v * factor` to the accumulator and
/// then multiplies `factor` by `r`, so that the first digit pushed occupies
/// the lowest place value.
#[derive(Debug, Clone)]
pub struct Packer {
    accumulator: BigUint,
    factor: BigUint,
    checksum: u8,
}

impl Default for Packer {
    fn default() -> Self {
        Self::new()
    }
}

impl Packer {
    /// Returns a fresh state with an accumulator of zero and a place value of one
    #[must_use]
    pub fn new() -> Self {
        Self {
            accumulator: BigUint::from(0u8),
            factor: BigUint::from(1u8),
            checksum: 0,
        }
    }

    /// Appends a digit of value `value` in radix `radix` at the next place value
    ///
    /// # Panics
    ///
    /// Panics if `value >= radix`. Every call site within this crate derives
    /// `value` from a bounds-checked source, so a violation indicates a bug in
    /// the caller rather than bad input.
    pub fn push_digit(&mut self, value: Digit, radix: Digit) {
        assert!(
            value < radix,
            "digit {} is not representable in radix {}",
            value,
            radix
        );
        if value != 0 {
            self.accumulator += &self.factor * value;
        }
        self.factor *= radix;
        self.checksum = fold_checksum(self.checksum, value);
        tracing::trace!(value, radix, "pushed digit");
    }

    /// Appends a run of whole bytes, each as a base-256 digit
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push_digit(b.into(), super::BYTE_RADIX);
        }
    }

    /// Returns the checksum of every digit pushed so far
    #[must_use]
    #[inline]
    pub const fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Returns a reference to the current accumulated value
    #[must_use]
    #[inline]
    pub const fn accumulator(&self) -> &BigUint {
        &self.accumulator
    }

    /// Seals the state with the width sentinel and returns the accumulated value
    ///
    /// The sentinel is a digit of value one in radix one: it adds the current
    /// place value to the accumulator, so that the result is strictly greater
    /// than any value that the digits pushed so far could produce. A most
    /// significant digit of zero therefore survives rendering into a
    /// positional string, where leading zeroes would otherwise vanish.
    #[must_use]
    pub fn finish(self) -> BigUint {
        let Packer {
            mut accumulator,
            factor,
            ..
        } = self;
        accumulator += factor;
        accumulator
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_is_sentinel_only() {
        assert_eq!(Packer::new().finish(), BigUint::from(1u8));
    }

    #[test]
    fn place_values() {
        let mut p = Packer::new();
        p.push_digit(1, 2);
        p.push_digit(3, 10);
        // 1 * 1 + 3 * 2
        assert_eq!(p.accumulator(), &BigUint::from(7u8));
        assert_eq!(p.checksum(), 4);
        // sentinel adds 2 * 10
        assert_eq!(p.finish(), BigUint::from(27u8));
    }

    #[test]
    fn leading_zero_digits_are_preserved() {
        let mut a = Packer::new();
        a.push_digit(5, 10);
        let mut b = Packer::new();
        b.push_digit(5, 10);
        b.push_digit(0, 10);
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    #[should_panic]
    fn out_of_range_digit() {
        Packer::new().push_digit(2, 2);
    }
}
