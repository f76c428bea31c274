//! Binding of table columns to record fields.
//!
//! A record type declares its columns through [`FromRow`], pairing a header
//! tag with the kind of value the field receives. The decoder resolves each
//! tag against the header once, then publishes converted cell values to the
//! trait's setter methods, row by row.
//!
//! In many cases (when fields hold primitives, or supply a handler closure),
//! [`FromRow`] can be derived. See the [`FromRow`](macro@FromRow) macro for
//! details.

use std::error::Error;

/// The error type returned by custom column decoders.
pub type CustomError = Box<dyn Error + Send + Sync>;

/// The kind of value a column decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// The cell text itself, already unescaped.
    String,
    /// A signed integer, accepting a base prefix (`0x`, `0o`, `0b`, or a
    /// leading zero for octal).
    Int,
    /// An unsigned base-10 integer, with no sign or prefix.
    Uint,
    /// A boolean, from the `true`/`t`/`1` and `false`/`f`/`0` families.
    Bool,
    /// A 64-bit floating-point number.
    Float,
    /// A caller-supplied decoder, invoked with the raw cell bytes.
    Custom,
}

/// A single column binding declared by a record type.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// The header tag this column binds to.
    ///
    /// An empty tag leaves the column unbound: it is skipped during decoding
    /// and its field keeps the record's default value.
    pub tag: &'static str,
    /// The kind of value the field receives.
    pub kind: Kind,
}

/// Derive [`FromRow`] for a struct representing a single record.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To bind a field to a header column, add the `column("tag")` attribute.
/// The column's kind is inferred from the field's type, which must be
/// `String`, a sized integer, `bool`, `f32`, or `f64`. Fields without the
/// attribute are left at their default values.
///
/// ```
/// #[derive(Debug, Default, FromRow)]
/// struct Entry {
///     #[column("name")]
///     name: String,
///     #[column("size")]
///     size: u64,
///     #[column("offset")]
///     offset: i32,
/// }
/// ```
///
/// To decode a cell yourself (for example, into an enumeration), supply a
/// handler closure taking the field and the raw cell bytes. The closure
/// returns a `Result<(), CustomError>`; a returned error aborts the decode,
/// wrapped with the column's tag.
///
/// ```
/// #[derive(Debug, Default, FromRow)]
/// struct Check {
///     #[column("status", |s, raw| {
///         *s = match raw {
///             b"OK" => true,
///             b"NG" => false,
///             _ => return Err("neither OK nor NG".into()),
///         };
///         Ok(())
///     })]
///     status: bool,
/// }
/// ```
#[cfg(feature = "derive")]
pub use trestle_derive::FromRow;

/// Receive cell values for the columns of a record.
///
/// Before publishing, cells are converted to the primitive declared by their
/// [`Column`], and unbound columns are skipped. The `column` argument of
/// each setter is the index into [`columns`](FromRow::columns), not the
/// position in the header.
///
/// The default implementation of each setter ignores received values.
///
/// See the [`FromRow`](macro@FromRow) derive macro for an automatic
/// implementation of this trait.
#[allow(unused_variables)]
pub trait FromRow: Default {
    /// The columns bound by this record, in declaration order.
    fn columns() -> &'static [Column];

    /// Set a string column of the record.
    fn set_string(&mut self, column: usize, value: &str) {}
    /// Set a signed integer column of the record.
    fn set_int(&mut self, column: usize, value: i64) {}
    /// Set an unsigned integer column of the record.
    fn set_uint(&mut self, column: usize, value: u64) {}
    /// Set a boolean column of the record.
    fn set_bool(&mut self, column: usize, value: bool) {}
    /// Set a floating-point column of the record.
    fn set_float(&mut self, column: usize, value: f64) {}

    /// Decode a custom column of the record from the raw cell bytes.
    fn set_custom(&mut self, column: usize, raw: &[u8]) -> Result<(), CustomError> {
        Ok(())
    }
}

/// Collect decoded records, in table order.
///
/// Implemented for `Vec`, the usual destination. Each record is decoded
/// completely before being appended, so a failing row never leaves a partial
/// record behind.
pub trait FromRows {
    /// The record type collected.
    type Record: FromRow;

    /// Append a decoded record.
    fn append(&mut self, record: Self::Record);
}

impl<T: FromRow> FromRows for Vec<T> {
    type Record = T;

    fn append(&mut self, record: T) {
        self.push(record);
    }
}
