//! Encoding and decoding of whole tokens
//!
//! This module ties the [`Schema`], the per-field digit logic of
//! [`Field`](crate::field::Field), the mixed-radix engine in [`crate::radix`]
//! and the [`base62`](crate::base62) transcoder together into the two entry
//! points [`encode`] and [`decode`].
//!
//! # Token layout
//!
//! From the lowest place value upwards, a token holds:
//!
//!   1. the schema fingerprint, as a base-256 digit
//!   2. the digits of every field, in schema order
//!   3. the checksum of all preceding digits, as a base-256 digit
//!   4. the width sentinel (see [`Packer::finish`])
//!
//! and is rendered in base 62, most significant symbol first.
//!
//! # Failure precedence
//!
//! Decoding checks the fingerprint before interpreting any field. When a
//! field's digits are intact but its value is not (a string whose bytes are
//! not UTF-8), the failure is held back until the checksum has been read:
//! if the checksum disagrees, [`DecodeError::Checksum`] is reported instead,
//! since corruption is the more fundamental explanation. A token that runs
//! out of digits is reported as [`DecodeError::TruncatedInput`] at once, as
//! there is no checksum left to read.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::base62;
use crate::radix::{Packer, Unpacker, BYTE_RADIX};
use crate::schema::Schema;
use crate::value::{Value, Values};

pub mod error;

pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult, Position};

use error::ConsumeError;

/// Trait for name-indexed collections of values that can be encoded
pub trait ValueSource {
    /// Returns the value held for the field `name`, if any
    fn get_value(&self, name: &str) -> Option<&Value>;
}

impl<S: BuildHasher> ValueSource for HashMap<String, Value, S> {
    fn get_value(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl ValueSource for BTreeMap<String, Value> {
    fn get_value(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<V: ValueSource + ?Sized> ValueSource for &V {
    fn get_value(&self, name: &str) -> Option<&Value> {
        (**self).get_value(name)
    }
}

/// Packs `values` into a token according to `schema`
///
/// Every field of `schema` must have a value in `values`; entries for names
/// that the schema does not define are ignored.
pub fn encode<V: ValueSource + ?Sized>(schema: &Schema, values: &V) -> EncodeResult<String> {
    tracing::debug!(
        fields = schema.len(),
        fingerprint = schema.fingerprint(),
        "encoding"
    );

    let mut packer = Packer::new();
    packer.push_digit(schema.fingerprint().into(), BYTE_RADIX);

    for field in schema.fields() {
        let value = values
            .get_value(field.name())
            .ok_or_else(|| EncodeError::MissingField {
                field: field.name().to_owned(),
            })?;
        field
            .emit(value, &mut packer)
            .map_err(|err| err.in_field(field.name()))?;
    }

    let checksum = packer.checksum();
    packer.push_digit(checksum.into(), BYTE_RADIX);

    let token = base62::encode(&packer.finish());
    tracing::debug!(checksum, len = token.len(), "encoded token");
    Ok(token)
}

/// Unpacks a token produced by [`encode`] with the same schema
pub fn decode(schema: &Schema, token: &str) -> DecodeResult<Values> {
    tracing::debug!(
        fields = schema.len(),
        fingerprint = schema.fingerprint(),
        len = token.len(),
        "decoding"
    );

    let mut unpacker = Unpacker::new(base62::decode(token)?);

    let found = unpacker
        .pop_digit(BYTE_RADIX)
        .map_err(|_| DecodeError::TruncatedInput {
            at: Position::Fingerprint,
        })? as u8;
    if found != schema.fingerprint() {
        return Err(DecodeError::SchemaMismatch {
            expected: schema.fingerprint(),
            found,
        });
    }

    let mut values = Values::new();
    let mut deferred: Option<DecodeError> = None;
    for field in schema.fields() {
        match field.consume(&mut unpacker) {
            Ok(value) => {
                values.insert(field.name().to_owned(), value);
            }
            Err(err @ ConsumeError::InvalidUtf8(_)) => {
                tracing::debug!(field = field.name(), "deferring field error until checksum");
                deferred.get_or_insert(err.in_field(field.name()));
            }
            Err(err @ ConsumeError::Truncated) => return Err(err.in_field(field.name())),
        }
    }

    let expected = unpacker.checksum();
    let found = unpacker
        .pop_digit(BYTE_RADIX)
        .map_err(|_| DecodeError::TruncatedInput {
            at: Position::Checksum,
        })? as u8;
    if found != expected {
        return Err(DecodeError::Checksum { expected, found });
    }

    if let Some(err) = deferred {
        return Err(err);
    }

    if !unpacker.is_residual_one() {
        return Err(DecodeError::TrailingData {
            residual_bits: unpacker.residual().bits(),
        });
    }

    tracing::debug!(checksum = expected, "decoded token");
    Ok(values)
}

impl Schema {
    /// Packs `values` into a token; see [`encode`]
    pub fn encode<V: ValueSource + ?Sized>(&self, values: &V) -> EncodeResult<String> {
        encode(self, values)
    }

    /// Unpacks a token produced with this schema; see [`decode`]
    pub fn decode(&self, token: &str) -> DecodeResult<Values> {
        decode(self, token)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    const COLORS: [&str; 4] = ["red", "green", "blue", "transparent"];

    fn form() -> Schema {
        Schema::new()
            .with_number_field("amount")
            .and_then(|s| s.with_boolean_field("subscribed"))
            .and_then(|s| s.with_string_field("comment", 32))
            .and_then(|s| s.with_enumeration_field("color", COLORS))
            .and_then(|s| s.with_number_field("offset"))
            .unwrap()
    }

    fn form_values(amount: String, subscribed: bool, comment: String, color: usize, offset: i64) -> Values {
        Values::from([
            ("amount".to_owned(), Value::Number(amount)),
            ("subscribed".to_owned(), Value::Boolean(subscribed)),
            ("comment".to_owned(), Value::String(comment)),
            ("color".to_owned(), Value::option(COLORS[color])),
            ("offset".to_owned(), Value::from(offset)),
        ])
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            amount in "-?[0-9]{1,40}(\\.[0-9]{1,20})?",
            subscribed in any::<bool>(),
            comment in "\\PC{0,8}",
            color in 0usize..4,
            offset in any::<i64>(),
        ) {
            let schema = form();
            let values = form_values(amount, subscribed, comment, color, offset);
            let token = schema.encode(&values).unwrap();
            prop_assert!(token.bytes().all(|b| b.is_ascii_alphanumeric()));
            prop_assert_eq!(schema.decode(&token), Ok(values));
        }
    }

    proptest! {
        #[test]
        fn prop_foreign_schema_rejected(max_length in 0u32..512) {
            let schema = form();
            let token = schema.encode(&form_values("1".into(), true, String::new(), 0, 0)).unwrap();
            let other = Schema::new().with_string_field("comment", max_length).unwrap();
            let result = other.decode(&token);
            if other.fingerprint() != schema.fingerprint() {
                prop_assert_eq!(
                    result,
                    Err(DecodeError::SchemaMismatch {
                        expected: other.fingerprint(),
                        found: schema.fingerprint(),
                    })
                );
            } else {
                prop_assert!(result.is_err());
            }
        }
    }

    #[test]
    fn fingerprint_collisions_are_rare() {
        let schema = form();
        let token = schema.encode(&form_values("1".into(), true, String::new(), 0, 0)).unwrap();

        let mut collisions = 0usize;
        for max_length in 0u32..512 {
            let other = Schema::new().with_string_field("comment", max_length).unwrap();
            match other.decode(&token) {
                Err(DecodeError::SchemaMismatch { .. }) => {}
                Err(_) => {
                    assert_eq!(other.fingerprint(), schema.fingerprint());
                    collisions += 1;
                }
                Ok(values) => panic!("decoded {:?} with `{}`", values, other.descriptor()),
            }
        }
        // one in 256 is expected from a single byte of hash
        assert!(collisions <= 8, "{} of 512 schemas collided", collisions);
    }

    #[test]
    fn single_character_corruption() {
        let schema = form();
        let values = form_values("-12.75".into(), true, "héllo wörld".into(), 2, -40);
        let token = schema.encode(&values).unwrap();

        let mut total = 0usize;
        for (ix, orig) in token.char_indices() {
            for &sym in base62::ALPHABET.iter() {
                let sym = sym as char;
                if sym == orig {
                    continue;
                }
                let mut corrupted = token.clone();
                corrupted.replace_range(ix..ix + 1, sym.encode_utf8(&mut [0; 4]));
                total += 1;
                match schema.decode(&corrupted) {
                    Err(
                        DecodeError::SchemaMismatch { .. }
                        | DecodeError::Checksum { .. }
                        | DecodeError::TruncatedInput { .. }
                        | DecodeError::TrailingData { .. }
                        | DecodeError::InvalidUtf8 { .. },
                    ) => {}
                    other => panic!("`{}` decoded as {:?}", corrupted, other),
                }
            }
        }
        assert_eq!(total, token.len() * 61);
    }

    #[test]
    fn boundary_values() {
        let schema = Schema::new()
            .with_number_field("n")
            .and_then(|s| s.with_string_field("s", 6))
            .unwrap();
        for (n, s) in [
            ("0", ""),
            ("-0.5", "abcdef"),
            ("98765432109876543210987654321098765432109876543210", "ünï"),
            ("100", "€€"),
        ] {
            let values = Values::from([
                ("n".to_owned(), Value::number(n)),
                ("s".to_owned(), Value::from(s)),
            ]);
            let token = schema.encode(&values).unwrap();
            assert_eq!(schema.decode(&token), Ok(values));
        }
    }
}
