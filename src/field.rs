//! Typed schema fields
//!
//! Each [`Field`] pairs a name with a [`FieldKind`], and defines a
//! self-delimiting digit sequence for values of that kind:
//!
//! | Kind          | Digits emitted                                                      |
//! |---------------|---------------------------------------------------------------------|
//! | `Number`      | sign (radix 2), integral digits + terminator, fractional digits + terminator (radix 11) |
//! | `Boolean`     | one digit, radix 2                                                  |
//! | `String`      | byte length (radix `max_length + 1`), then one radix-256 digit per UTF-8 byte |
//! | `Enumeration` | option index (radix = number of options)                            |
//!
//! [`Field::emit`] and [`Field::consume`] are exact inverses of one another,
//! and use the same radices in the same order.

use std::fmt::Write as _;

#[cfg(feature = "serde_impls")]
use serde::{Deserialize, Serialize};

use crate::conv::error::{ConsumeError, EmitError};
use crate::error::{RangeError, WidthError};
use crate::radix::{Digit, Packer, Unpacker};
use crate::value::{DecimalParts, Value};

/// Radix of the sign digit of a number, and of a boolean
const BINARY_RADIX: Digit = 2;

/// Radix of the decimal digits of a number: ten digit values plus terminator
const DECIMAL_RADIX: Digit = 11;

/// Digit value closing a run of decimal digits
const DECIMAL_TERMINATOR: Digit = 10;

/// Kind of a field, along with any parameters that determine its encoding
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_impls", derive(Serialize, Deserialize))]
pub enum FieldKind {
    /// Arbitrary-precision signed decimal number
    Number,
    Boolean,
    /// UTF-8 string of at most `max_length` bytes
    String { max_length: u32 },
    /// One value out of a fixed, ordered option list
    Enumeration { options: Vec<String> },
}

impl FieldKind {
    /// Tag used for this kind in the schema descriptor
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            FieldKind::Number => "num",
            FieldKind::Boolean => "bool",
            FieldKind::String { .. } => "string",
            FieldKind::Enumeration { .. } => "multi",
        }
    }
}

/// A named, typed unit of a schema
///
/// Fields are constructed and validated by [`Schema`](crate::schema::Schema)
/// on registration, and are immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_impls", derive(Serialize, Deserialize))]
pub struct Field {
    name: String,
    kind: FieldKind,
}

impl Field {
    pub(crate) fn new(name: String, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Canonical descriptor fragment for this field, as folded into the
    /// schema fingerprint
    ///
    /// The fragment has the form `,<name>;<tag>`, followed by `-<max_length>`
    /// for strings and `+[<option>,...]` for enumerations.
    #[must_use]
    pub fn descriptor(&self) -> String {
        let mut ret = format!(",{};{}", self.name, self.kind.tag());
        match &self.kind {
            FieldKind::String { max_length } => {
                let _ = write!(ret, "-{}", max_length);
            }
            FieldKind::Enumeration { options } => {
                let _ = write!(ret, "+[{}]", options.join(","));
            }
            FieldKind::Number | FieldKind::Boolean => {}
        }
        ret
    }

    /// Pushes the digit sequence representing `value` onto `packer`
    ///
    /// On failure, nothing is guaranteed about the state of `packer`, which
    /// should be discarded.
    pub fn emit(&self, value: &Value, packer: &mut Packer) -> Result<(), EmitError> {
        match (&self.kind, value) {
            (FieldKind::Number, Value::Number(text)) => emit_number(text, packer),
            (FieldKind::Boolean, Value::Boolean(b)) => {
                packer.push_digit(Digit::from(*b), BINARY_RADIX);
                Ok(())
            }
            (FieldKind::String { max_length }, Value::String(s)) => {
                let bytes = s.as_bytes();
                let len = Digit::try_from(bytes.len())
                    .ok()
                    .filter(|len| len <= max_length)
                    .ok_or_else(|| {
                        RangeError::from(WidthError::TooWide {
                            limit: *max_length as usize,
                            actual: bytes.len(),
                        })
                    })?;
                packer.push_digit(len, max_length + 1);
                packer.push_bytes(bytes);
                Ok(())
            }
            (FieldKind::Enumeration { options }, Value::Enumeration(opt)) => {
                let ix = options.iter().position(|o| o == opt).ok_or_else(|| {
                    RangeError::UnknownOption {
                        value: opt.clone(),
                        options: options.clone(),
                    }
                })?;
                // option count was checked to fit a digit on registration
                packer.push_digit(ix as Digit, options.len() as Digit);
                Ok(())
            }
            (kind, value) => Err(EmitError::KindMismatch {
                expected: kind.tag(),
                found: value.kind_name(),
            }),
        }
    }

    /// Pops the digit sequence of a single value off of `unpacker`
    ///
    /// A [`ConsumeError::InvalidUtf8`] leaves `unpacker` positioned just after
    /// this field, so that decoding may proceed to verify the checksum.
    pub fn consume(&self, unpacker: &mut Unpacker) -> Result<Value, ConsumeError> {
        match &self.kind {
            FieldKind::Number => {
                let negative = unpacker.pop_digit(BINARY_RADIX)? == 1;
                let integral = consume_decimal_run(unpacker)?;
                let fractional = consume_decimal_run(unpacker)?;
                Ok(Value::Number(DecimalParts::join(
                    negative,
                    &integral,
                    &fractional,
                )))
            }
            FieldKind::Boolean => Ok(Value::Boolean(unpacker.pop_digit(BINARY_RADIX)? == 1)),
            FieldKind::String { max_length } => {
                let len = unpacker.pop_digit(max_length + 1)?;
                let bytes = unpacker.pop_bytes(len as usize)?;
                Ok(Value::String(String::from_utf8(bytes)?))
            }
            FieldKind::Enumeration { options } => {
                let ix = unpacker.pop_digit(options.len() as Digit)?;
                Ok(Value::Enumeration(options[ix as usize].clone()))
            }
        }
    }
}

fn emit_number(text: &str, packer: &mut Packer) -> Result<(), EmitError> {
    let parts = DecimalParts::split(text);
    let integral = decimal_digits(parts.integral)?;
    let fractional = match parts.fractional {
        Some(run) => decimal_digits(run)?,
        None => Vec::new(),
    };

    packer.push_digit(Digit::from(parts.negative), BINARY_RADIX);
    for run in [integral, fractional] {
        for d in run {
            packer.push_digit(d, DECIMAL_RADIX);
        }
        packer.push_digit(DECIMAL_TERMINATOR, DECIMAL_RADIX);
    }
    Ok(())
}

/// Validates a run of decimal digits on one side of the decimal point
///
/// A run that is present must hold at least one digit: `"1."` and `"-"` are
/// rejected rather than shortened to `"1"` and `"-0"`.
fn decimal_digits(run: &str) -> Result<Vec<Digit>, EmitError> {
    if run.is_empty() {
        return Err(EmitError::InvalidDigit(None));
    }
    run.chars()
        .map(|ch| ch.to_digit(10).ok_or(EmitError::InvalidDigit(Some(ch))))
        .collect()
}

fn consume_decimal_run(unpacker: &mut Unpacker) -> Result<String, ConsumeError> {
    let mut ret = String::new();
    loop {
        match unpacker.pop_digit(DECIMAL_RADIX)? {
            DECIMAL_TERMINATOR => break,
            d => ret.push(char::from(b'0' + d as u8)),
        }
    }
    Ok(ret)
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(field: &Field, value: Value) -> Value {
        let mut p = Packer::new();
        field.emit(&value, &mut p).unwrap();
        let mut u = Unpacker::new(p.finish());
        let ret = field.consume(&mut u).unwrap();
        assert!(u.is_residual_one());
        ret
    }

    fn string_field(max_length: u32) -> Field {
        Field::new("s".into(), FieldKind::String { max_length })
    }

    #[test]
    fn number_round_trips() {
        let f = Field::new("n".into(), FieldKind::Number);
        for text in ["0", "-0.5", "30", "12345678901234567890123456789", "3.14159", "-7"] {
            assert_eq!(round_trip(&f, Value::number(text)), Value::number(text));
        }
    }

    #[test]
    fn number_digits_are_validated() {
        let f = Field::new("n".into(), FieldKind::Number);
        for (text, bad) in [("12a", 'a'), ("1.2.3", '.'), ("+4", '+'), ("inf", 'i')] {
            assert_eq!(
                f.emit(&Value::number(text), &mut Packer::new()),
                Err(EmitError::InvalidDigit(Some(bad)))
            );
        }
    }

    #[test]
    fn number_digit_runs_are_not_empty() {
        let f = Field::new("n".into(), FieldKind::Number);
        for text in ["", "-", ".", "-.", "1.", "-7.", ".5", "-.5"] {
            assert_eq!(
                f.emit(&Value::number(text), &mut Packer::new()),
                Err(EmitError::InvalidDigit(None)),
                "{:?} should be rejected",
                text
            );
        }
    }

    #[test]
    fn number_digit_layout() {
        let f = Field::new("n".into(), FieldKind::Number);
        let mut p = Packer::new();
        f.emit(&Value::number("-1"), &mut p).unwrap();
        // sign 1, digit 1, terminator, terminator
        assert_eq!(p.checksum(), 1 + 1 + 10 + 10);
    }

    #[test]
    fn boolean_round_trips() {
        let f = Field::new("b".into(), FieldKind::Boolean);
        assert_eq!(round_trip(&f, Value::Boolean(true)), Value::Boolean(true));
        assert_eq!(round_trip(&f, Value::Boolean(false)), Value::Boolean(false));
    }

    #[test]
    fn string_bounds_are_bytes() {
        let f = string_field(4);
        assert_eq!(round_trip(&f, Value::from("")), Value::from(""));
        assert_eq!(round_trip(&f, Value::from("abcd")), Value::from("abcd"));
        // two code points, four bytes
        assert_eq!(round_trip(&f, Value::from("ßü")), Value::from("ßü"));
        assert_eq!(
            f.emit(&Value::from("ßüx"), &mut Packer::new()),
            Err(EmitError::ValueRange(RangeError::Width(WidthError::TooWide {
                limit: 4,
                actual: 5
            })))
        );
    }

    #[test]
    fn zero_length_string() {
        let f = string_field(0);
        assert_eq!(round_trip(&f, Value::from("")), Value::from(""));
        assert!(f.emit(&Value::from("a"), &mut Packer::new()).is_err());
    }

    #[test]
    fn enumeration_bounds() {
        let f = Field::new(
            "color".into(),
            FieldKind::Enumeration {
                options: vec!["red".into(), "green".into(), "blue".into()],
            },
        );
        assert_eq!(round_trip(&f, Value::option("red")), Value::option("red"));
        assert_eq!(round_trip(&f, Value::option("blue")), Value::option("blue"));
        assert!(matches!(
            f.emit(&Value::option("mauve"), &mut Packer::new()),
            Err(EmitError::ValueRange(RangeError::UnknownOption { .. }))
        ));
    }

    #[test]
    fn kind_mismatch() {
        let f = Field::new("b".into(), FieldKind::Boolean);
        assert_eq!(
            f.emit(&Value::from("yes"), &mut Packer::new()),
            Err(EmitError::KindMismatch {
                expected: "bool",
                found: "string"
            })
        );
    }

    #[test]
    fn invalid_utf8_consumes_whole_field() {
        let f = string_field(2);
        let mut p = Packer::new();
        p.push_digit(2, 3);
        p.push_bytes(&[0xff, 0xfe]);
        let mut u = Unpacker::new(p.finish());
        assert!(matches!(
            f.consume(&mut u),
            Err(ConsumeError::InvalidUtf8(_))
        ));
        assert!(u.is_residual_one());
    }

    #[test]
    fn descriptors() {
        assert_eq!(
            Field::new("age".into(), FieldKind::Number).descriptor(),
            ",age;num"
        );
        assert_eq!(string_field(10).descriptor(), ",s;string-10");
        assert_eq!(
            Field::new(
                "c".into(),
                FieldKind::Enumeration {
                    options: vec!["a".into(), "b".into()]
                }
            )
            .descriptor(),
            ",c;multi+[a,b]"
        );
    }
}
