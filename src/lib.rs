//! Schema-driven packing of form values into compact tokens
//!
//! # Overview
//!
//! `formpack` packs a small, fixed set of named and typed values (numbers,
//! booleans, bounded strings and enumerations) into a single
//! arbitrary-precision integer, using a mixed-radix positional encoding, and
//! renders that integer as a short string over `[0-9a-zA-Z]`. The result is a
//! token that is safe to embed in a URL, whose shape is dictated entirely by
//! a [`Schema`] known to both ends.
//!
//! ```
//! use formpack::{Schema, Value, Values};
//!
//! let schema = Schema::new()
//!     .with_number_field("age")?
//!     .with_boolean_field("active")?
//!     .with_string_field("name", 10)?;
//!
//! let values = Values::from([
//!     ("age".to_owned(), Value::from(30)),
//!     ("active".to_owned(), Value::from(true)),
//!     ("name".to_owned(), Value::from("Bob")),
//! ]);
//!
//! let token = schema.encode(&values)?;
//! assert_eq!(schema.decode(&token)?, values);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Design
//!
//! Every field contributes a self-delimiting run of digits, each in a radix
//! of the field's choosing (see [`field`]). The digits are accumulated into a
//! [`BigUint`](num_bigint::BigUint) by the engine in [`radix`], bracketed by
//! a one-byte schema fingerprint and a one-byte checksum, and sealed with a
//! sentinel that preserves the digit width. Decoding peels the same digits
//! back off in the same order, validating the fingerprint, the checksum, and
//! that nothing is left over (see [`conv`]).
//!
//! Tokens are neither encrypted nor authenticated: the fingerprint and
//! checksum guard against schema drift and accidental corruption only.

pub mod base62;
pub mod conv;
pub mod error;
pub mod field;
pub mod prelude;
pub mod radix;
pub mod schema;
pub mod value;

pub use crate::conv::{
    decode, encode, DecodeError, DecodeResult, EncodeError, EncodeResult, Position, ValueSource,
};
pub use crate::error::{RangeError, SchemaError, WidthError};
pub use crate::field::{Field, FieldKind};
pub use crate::schema::Schema;
pub use crate::value::{Value, Values};
