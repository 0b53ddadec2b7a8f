//! Mixed-radix accumulation engine
//!
//! This module contains the two halves of the positional arithmetic that
//! every token is built from:
//!
//!   - [`Packer`], the encode-side state, which folds `(digit, radix)` pairs
//!     into a single [`BigUint`](num_bigint::BigUint) at increasing place value
//!   - [`Unpacker`], the decode-side state, which peels digits back off in the
//!     same order they were pushed (lowest place value first)
//!
//! Each digit may use a different radix, chosen by the caller at the point of
//! the push or pop. The only contract is that the sequence of radices used
//! on the decode side mirrors the one used on the encode side exactly.
//!
//! Both states also keep a running checksum, the sum of every digit value
//! modulo 256, which the orchestration layer in [`crate::conv`] uses to detect
//! corrupted tokens.
//!
//! Neither type is meant to outlive a single encode or decode call.

pub mod packer;
pub mod unpacker;

pub use packer::Packer;
pub use unpacker::{Exhausted, Unpacker};

/// Value of a single mixed-radix digit, and the radix it is expressed in.
///
/// All radices used by the codec are small (at most 256, except for the
/// length prefix of very long strings and the option count of very large
/// enumerations), so a 32-bit word suffices for both.
pub type Digit = u32;

/// Radix used for whole bytes, the fingerprint and the checksum.
pub const BYTE_RADIX: Digit = 256;

/// Folds a digit value into a running checksum.
#[inline]
#[must_use]
pub(crate) fn fold_checksum(sum: u8, value: Digit) -> u8 {
    // Truncation is equivalent to reducing `value` modulo 256 first
    sum.wrapping_add(value as u8)
}
