//! Assorted imports to use
//! when building schemas and handling tokens
//!

#[doc(inline)]
pub use crate::conv::{DecodeError, EncodeError, ValueSource};
#[doc(inline)]
pub use crate::error::SchemaError;
#[doc(inline)]
pub use crate::schema::Schema;
#[doc(inline)]
pub use crate::value::{Value, Values};
