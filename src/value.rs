//! Runtime values carried by schema fields
//!
//! A [`Value`] is the dynamically-typed counterpart of a
//! [`FieldKind`](crate::field::FieldKind). Numbers are carried in their
//! decimal textual form, since the codec transcribes them digit by digit and
//! places no bound on their precision.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[cfg(feature = "serde_impls")]
use serde::{Deserialize, Serialize};

/// A single field value
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_impls", derive(Serialize, Deserialize))]
pub enum Value {
    /// Decimal number in textual form, e.g. `"-12.5"`
    Number(String),
    Boolean(bool),
    String(String),
    /// One of the options of an enumeration field
    Enumeration(String),
}

/// Mapping from field name to value, as produced by decoding
pub type Values = BTreeMap<String, Value>;

impl Value {
    /// Constructs a `Value::Number` from its decimal textual form
    ///
    /// No validation is performed until the value is encoded.
    pub fn number(text: impl Into<String>) -> Self {
        Self::Number(text.into())
    }

    /// Constructs a `Value::Enumeration` selecting the option `option`
    pub fn option(option: impl Into<String>) -> Self {
        Self::Enumeration(option.into())
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the textual payload of any non-boolean value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Number(s) | Value::String(s) | Value::Enumeration(s) => Some(s.as_str()),
            Value::Boolean(_) => None,
        }
    }

    /// Short name of the variant, matching the descriptor tag of the
    /// corresponding field kind
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "num",
            Value::Boolean(_) => "bool",
            Value::String(_) => "string",
            Value::Enumeration(_) => "multi",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(s) | Value::String(s) | Value::Enumeration(s) => f.write_str(s),
            Value::Boolean(b) => Display::fmt(b, f),
        }
    }
}

macro_rules! impl_number_from {
    ($($src:ty),* $(,)?) => {
        $(
            impl From<$src> for Value {
                fn from(n: $src) -> Self {
                    Self::Number(n.to_string())
                }
            }
        )*
    };
}

impl_number_from!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<f64> for Value {
    /// Non-finite values produce text that fails to encode
    fn from(n: f64) -> Self {
        Self::Number(n.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// Decimal number split into its sign and the digit runs on either side of
/// the decimal point
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DecimalParts<'a> {
    pub negative: bool,
    pub integral: &'a str,
    /// Digits after the decimal point, or `None` if there is no point
    pub fractional: Option<&'a str>,
}

impl<'a> DecimalParts<'a> {
    /// Splits `text` at the first decimal point, after stripping a leading `-`
    ///
    /// Digit validation is left to the caller, so that the offending
    /// character can be reported in context.
    pub fn split(text: &'a str) -> Self {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (integral, fractional) = match unsigned.split_once('.') {
            Some((integral, fractional)) => (integral, Some(fractional)),
            None => (unsigned, None),
        };
        Self {
            negative,
            integral,
            fractional,
        }
    }

    /// Reassembles the textual form, omitting the decimal point when there
    /// is no fractional part
    pub fn join(negative: bool, integral: &str, fractional: &str) -> String {
        let mut ret = String::with_capacity(integral.len() + fractional.len() + 2);
        if negative {
            ret.push('-');
        }
        ret.push_str(integral);
        if !fractional.is_empty() {
            ret.push('.');
            ret.push_str(fractional);
        }
        ret
    }
}
