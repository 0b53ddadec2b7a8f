//! Ordered field registry and schema fingerprint
//!
//! A [`Schema`] is the wire contract shared by encoder and decoder: the set
//! of fields, their order, and their kind parameters all determine the digit
//! sequence of a token. Any change to one of these is a change of schema.
//!
//! # Fingerprint
//!
//! As fields are registered, a canonical descriptor fragment for each one
//! (see [`Field::descriptor`]) is appended to a running descriptor string,
//! and a one-byte rolling hash of that string is maintained alongside it.
//! The hash is computed over the UTF-16 code units `c` of the descriptor as
//!
//! ```text
//! h = (h * 31 + c) mod 256
//! ```
//!
//! starting from `h = 0`. The fingerprint is written as the first digit of
//! every token, and checked first on decode, so that a token produced for a
//! different schema is rejected before any field is interpreted. With only
//! 256 possible values it is a diagnostic aid against accidental schema
//! drift, not a security mechanism.
//!
//! # Registration
//!
//! Fields are registered in wire order through the `add_*_field` methods,
//! which borrow the schema mutably, or the `with_*_field` methods, which
//! consume and return it for chained construction. Duplicate names and
//! degenerate field parameters are rejected immediately with a
//! [`SchemaError`].

use std::collections::HashSet;

use crate::error::SchemaError;
use crate::field::{Field, FieldKind};
use crate::radix::Digit;

/// Ordered collection of uniquely-named fields, with its derived fingerprint
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: Vec<Field>,
    names: HashSet<String>,
    descriptor: String,
    fingerprint: u8,
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Schema {}

/// Folds the UTF-16 code units of `fragment` into a running fingerprint
#[must_use]
fn fold_fingerprint(hash: u8, fragment: &str) -> u8 {
    fragment
        .encode_utf16()
        // only the low byte of each unit survives the reduction
        .fold(hash, |h, unit| h.wrapping_mul(31).wrapping_add(unit as u8))
}

impl Schema {
    /// Returns an empty schema
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push_field(&mut self, name: &str, kind: FieldKind) -> Result<&mut Self, SchemaError> {
        if self.names.contains(name) {
            return Err(SchemaError::DuplicateField(name.to_owned()));
        }
        match &kind {
            FieldKind::String { max_length } if *max_length == Digit::MAX => {
                return Err(SchemaError::LengthLimit {
                    field: name.to_owned(),
                    max_length: *max_length,
                });
            }
            FieldKind::Enumeration { options } if options.is_empty() => {
                return Err(SchemaError::EmptyOptions {
                    field: name.to_owned(),
                });
            }
            FieldKind::Enumeration { options } if Digit::try_from(options.len()).is_err() => {
                return Err(SchemaError::TooManyOptions {
                    field: name.to_owned(),
                    count: options.len(),
                });
            }
            _ => {}
        }

        let field = Field::new(name.to_owned(), kind);
        let fragment = field.descriptor();
        self.fingerprint = fold_fingerprint(self.fingerprint, &fragment);
        self.descriptor.push_str(&fragment);
        tracing::debug!(
            field = name,
            kind = field.kind().tag(),
            fingerprint = self.fingerprint,
            "registered field"
        );

        self.names.insert(name.to_owned());
        self.fields.push(field);
        Ok(self)
    }

    /// Registers an arbitrary-precision decimal field
    pub fn add_number_field(&mut self, name: &str) -> Result<&mut Self, SchemaError> {
        self.push_field(name, FieldKind::Number)
    }

    pub fn add_boolean_field(&mut self, name: &str) -> Result<&mut Self, SchemaError> {
        self.push_field(name, FieldKind::Boolean)
    }

    /// Registers a string field holding at most `max_length` bytes of UTF-8
    ///
    /// Note that the bound applies to the encoded byte length, not to the
    /// number of characters.
    pub fn add_string_field(
        &mut self,
        name: &str,
        max_length: u32,
    ) -> Result<&mut Self, SchemaError> {
        self.push_field(name, FieldKind::String { max_length })
    }

    /// Registers an enumeration field over `options`
    ///
    /// The order of `options` is significant, as each value is encoded as its
    /// index within the list.
    pub fn add_enumeration_field<I, S>(
        &mut self,
        name: &str,
        options: I,
    ) -> Result<&mut Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options.into_iter().map(Into::into).collect();
        self.push_field(name, FieldKind::Enumeration { options })
    }

    /// Consuming variant of [`add_number_field`](Self::add_number_field)
    pub fn with_number_field(mut self, name: &str) -> Result<Self, SchemaError> {
        self.add_number_field(name)?;
        Ok(self)
    }

    /// Consuming variant of [`add_boolean_field`](Self::add_boolean_field)
    pub fn with_boolean_field(mut self, name: &str) -> Result<Self, SchemaError> {
        self.add_boolean_field(name)?;
        Ok(self)
    }

    /// Consuming variant of [`add_string_field`](Self::add_string_field)
    pub fn with_string_field(mut self, name: &str, max_length: u32) -> Result<Self, SchemaError> {
        self.add_string_field(name, max_length)?;
        Ok(self)
    }

    /// Consuming variant of [`add_enumeration_field`](Self::add_enumeration_field)
    pub fn with_enumeration_field<I, S>(mut self, name: &str, options: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_enumeration_field(name, options)?;
        Ok(self)
    }

    /// Fields in wire order
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// One-byte hash of the descriptor of every field registered so far
    #[must_use]
    #[inline]
    pub const fn fingerprint(&self) -> u8 {
        self.fingerprint
    }

    /// Canonical textual descriptor the fingerprint is computed over
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}
