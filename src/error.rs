//! General error types
//!
//! This module contains the error types that are not specific to either
//! direction of transcoding: failures raised while a [`Schema`] is being
//! constructed, and the range-violation family that field values may trigger.
//!
//! Errors that are specific to encoding or decoding a token are defined in
//! [`crate::conv::error`], and typically wrap the types defined here.
//!
//! [`Schema`]: crate::schema::Schema

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Enumerated error type for failures related to schema constructs
/// that impose a check on the byte-width of their prospective values.
#[derive(Clone, PartialEq, PartialOrd, Eq, Ord, Debug)]
pub enum WidthError {
    /// Restriction on maximum byte-width exceeded
    TooWide { limit: usize, actual: usize },
}

impl Display for WidthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WidthError::TooWide { limit, actual } => {
                write!(f, "{actual}-byte value exceeded limit of {limit} bytes")
            }
        }
    }
}

impl Error for WidthError {}

/// Error type representing a field value that is well-formed, but falls
/// outside of the set of values the field can represent.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RangeError {
    /// String value whose UTF-8 encoding is wider than the field allows
    Width(WidthError),
    /// Enumeration value that is not one of the registered options
    UnknownOption { value: String, options: Vec<String> },
}

impl From<WidthError> for RangeError {
    fn from(err: WidthError) -> Self {
        Self::Width(err)
    }
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeError::Width(err) => Display::fmt(err, f),
            RangeError::UnknownOption { value, options } => {
                write!(
                    f,
                    "option `{}` unknown, expected one of [{}]",
                    value,
                    options.join(",")
                )
            }
        }
    }
}

impl Error for RangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RangeError::Width(err) => Some(err),
            RangeError::UnknownOption { .. } => None,
        }
    }
}

/// Error type for failures encountered while registering fields on a
/// [`Schema`](crate::schema::Schema).
///
/// All of these are construction-time failures; a schema that was built
/// without error can always be used for both encoding and decoding.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SchemaError {
    /// A field with the same name has already been registered
    DuplicateField(String),
    /// Enumeration field registered with an empty option list
    EmptyOptions { field: String },
    /// Enumeration field with more options than fit in a single digit
    TooManyOptions { field: String, count: usize },
    /// String field whose maximum length leaves no room for the length digit
    LengthLimit { field: String, max_length: u32 },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::DuplicateField(name) => write!(f, "duplicate field `{}`", name),
            SchemaError::EmptyOptions { field } => {
                write!(f, "enumeration field `{}` has no options", field)
            }
            SchemaError::TooManyOptions { field, count } => {
                write!(
                    f,
                    "enumeration field `{}` has {} options, more than a single digit can index",
                    field, count
                )
            }
            SchemaError::LengthLimit { field, max_length } => {
                write!(
                    f,
                    "string field `{}` declares maximum length {} which cannot be length-prefixed",
                    field, max_length
                )
            }
        }
    }
}

impl Error for SchemaError {}
