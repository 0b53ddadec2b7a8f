//! Error types reported by [`encode`](super::encode) and [`decode`](super::decode)
//!
//! Field-level failures are first raised without context, as [`EmitError`]
//! or [`ConsumeError`], and are then wrapped with the name of the offending
//! field into the caller-facing [`EncodeError`] and [`DecodeError`].

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::string::FromUtf8Error;

use crate::base62::InvalidCharacter;
use crate::error::RangeError;
use crate::radix::Exhausted;

/// Failure of [`Field::emit`](crate::field::Field::emit), before the field
/// name is attached
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmitError {
    ValueRange(RangeError),
    /// Non-decimal character in the textual form of a number, or `None`
    /// when a run of digits is empty
    InvalidDigit(Option<char>),
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl From<RangeError> for EmitError {
    fn from(err: RangeError) -> Self {
        Self::ValueRange(err)
    }
}

impl EmitError {
    pub(crate) fn in_field(self, field: &str) -> EncodeError {
        let field = field.to_owned();
        match self {
            EmitError::ValueRange(source) => EncodeError::ValueRange { field, source },
            EmitError::InvalidDigit(found) => EncodeError::InvalidDigit { field, found },
            EmitError::KindMismatch { expected, found } => EncodeError::KindMismatch {
                field,
                expected,
                found,
            },
        }
    }
}

/// Failure of [`Field::consume`](crate::field::Field::consume), before the
/// field name is attached
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsumeError {
    Truncated,
    InvalidUtf8(FromUtf8Error),
}

impl From<Exhausted> for ConsumeError {
    fn from(_: Exhausted) -> Self {
        Self::Truncated
    }
}

impl From<FromUtf8Error> for ConsumeError {
    fn from(err: FromUtf8Error) -> Self {
        Self::InvalidUtf8(err)
    }
}

impl ConsumeError {
    pub(crate) fn in_field(self, field: &str) -> DecodeError {
        match self {
            ConsumeError::Truncated => DecodeError::TruncatedInput {
                at: Position::Field(field.to_owned()),
            },
            ConsumeError::InvalidUtf8(source) => DecodeError::InvalidUtf8 {
                field: field.to_owned(),
                source,
            },
        }
    }
}

/// Enumeration over every way encoding a set of values can fail
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    /// No value was supplied for a field of the schema
    MissingField { field: String },
    /// Value is well-formed but cannot be represented by the field
    ValueRange { field: String, source: RangeError },
    /// Number value containing a character other than a decimal digit,
    /// a single leading `-`, or a single `.`, or missing the digits on
    /// either side of the `.` (`found` is then `None`)
    InvalidDigit { field: String, found: Option<char> },
    /// Value variant does not correspond to the kind of the field
    KindMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl EncodeError {
    /// Name of the field the error relates to
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            EncodeError::MissingField { field }
            | EncodeError::ValueRange { field, .. }
            | EncodeError::InvalidDigit { field, .. }
            | EncodeError::KindMismatch { field, .. } => field,
        }
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::MissingField { field } => {
                write!(f, "encoding field `{}`: no value provided", field)
            }
            EncodeError::ValueRange { field, source } => {
                write!(f, "encoding field `{}`: {}", field, source)
            }
            EncodeError::InvalidDigit {
                field,
                found: Some(ch),
            } => {
                write!(
                    f,
                    "encoding field `{}`: illegal digit `{}`",
                    field,
                    ch.escape_debug()
                )
            }
            EncodeError::InvalidDigit { field, found: None } => {
                write!(f, "encoding field `{}`: empty run of digits", field)
            }
            EncodeError::KindMismatch {
                field,
                expected,
                found,
            } => {
                write!(
                    f,
                    "encoding field `{}`: expected {} value, found {}",
                    field, expected, found
                )
            }
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EncodeError::ValueRange { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Location in the digit stream at which input ran out
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Position {
    Fingerprint,
    Field(String),
    Checksum,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Fingerprint => write!(f, "schema fingerprint"),
            Position::Field(name) => write!(f, "field `{}`", name),
            Position::Checksum => write!(f, "checksum"),
        }
    }
}

/// Enumeration over every way decoding a token can fail
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Token contains a character outside of `[0-9a-zA-Z]`
    InvalidCharacter(InvalidCharacter),
    /// Token was produced for a schema with a different fingerprint
    SchemaMismatch { expected: u8, found: u8 },
    /// Stored checksum disagrees with the digits actually decoded
    Checksum { expected: u8, found: u8 },
    /// Token ran out of digits before decoding was complete
    TruncatedInput { at: Position },
    /// Value left over once every digit was consumed was not the sentinel
    TrailingData { residual_bits: u64 },
    /// Bytes of a string field are not valid UTF-8
    InvalidUtf8 {
        field: String,
        source: FromUtf8Error,
    },
}

impl From<InvalidCharacter> for DecodeError {
    fn from(err: InvalidCharacter) -> Self {
        Self::InvalidCharacter(err)
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidCharacter(err) => Display::fmt(err, f),
            DecodeError::SchemaMismatch { expected, found } => {
                write!(
                    f,
                    "schema fingerprint {:#04x} does not match expected {:#04x} (incorrect input?)",
                    found, expected
                )
            }
            DecodeError::Checksum { expected, found } => {
                write!(
                    f,
                    "incorrect checksum (corrupted input?), got {:#04x}, expected {:#04x}",
                    found, expected
                )
            }
            DecodeError::TruncatedInput { at } => {
                write!(f, "input ran out while decoding {}", at)
            }
            DecodeError::TrailingData { residual_bits } => {
                write!(
                    f,
                    "{}-bit value left over after decoding (mismatched schema?)",
                    residual_bits
                )
            }
            DecodeError::InvalidUtf8 { field, source } => {
                write!(f, "decoding field `{}`: {}", field, source)
            }
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DecodeError::InvalidCharacter(err) => Some(err),
            DecodeError::InvalidUtf8 { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
