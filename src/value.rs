//! Conversion of cell text into primitive values.
//!
//! Literal grammars follow the compatibility target: signed integers accept
//! an explicit base prefix, unsigned integers are plain base-10, and
//! booleans use the `true`/`t`/`1` family of tokens.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// An error converting a cell into a primitive value.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An invalid signed integer literal.
    #[error("invalid integer literal {0:?}")]
    Int(String, #[source] Option<ParseIntError>),
    /// An invalid unsigned integer literal.
    #[error("invalid unsigned integer literal {0:?}")]
    Uint(String, #[source] Option<ParseIntError>),
    /// An invalid boolean literal.
    #[error("invalid boolean literal {0:?}")]
    Bool(String),
    /// An invalid floating-point literal.
    #[error("invalid float literal {0:?}")]
    Float(String, #[source] ParseFloatError),
}

/// Parse a signed integer, honoring a base prefix.
///
/// After an optional sign, `0x`, `0o`, and `0b` prefixes select their bases,
/// and a bare leading zero selects octal; anything else is decimal.
pub(crate) fn parse_int(cell: &str) -> Result<i64, ConvertError> {
    let (negative, rest) = match cell.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cell.strip_prefix('+').unwrap_or(cell)),
    };

    let (radix, digits) = if let Some(digits) = strip_prefix(rest, "0x", "0X") {
        (16, digits)
    } else if let Some(digits) = strip_prefix(rest, "0o", "0O") {
        (8, digits)
    } else if let Some(digits) = strip_prefix(rest, "0b", "0B") {
        (2, digits)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };

    // `from_str_radix` accepts a sign of its own, which would let an inner
    // sign slip through (as in "0x-1").
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(ConvertError::Int(cell.to_owned(), None));
    }

    let value = if negative {
        i64::from_str_radix(&format!("-{digits}"), radix)
    } else {
        i64::from_str_radix(digits, radix)
    };

    value.map_err(|err| ConvertError::Int(cell.to_owned(), Some(err)))
}

/// Strip a base prefix in either letter case.
fn strip_prefix<'a>(s: &'a str, lower: &str, upper: &str) -> Option<&'a str> {
    s.strip_prefix(lower).or_else(|| s.strip_prefix(upper))
}

/// Parse an unsigned integer from base-10 digits, with no sign or prefix.
pub(crate) fn parse_uint(cell: &str) -> Result<u64, ConvertError> {
    if cell.starts_with(['+', '-']) {
        return Err(ConvertError::Uint(cell.to_owned(), None));
    }

    cell.parse()
        .map_err(|err| ConvertError::Uint(cell.to_owned(), Some(err)))
}

/// Parse a boolean literal.
pub(crate) fn parse_bool(cell: &str) -> Result<bool, ConvertError> {
    match cell {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ConvertError::Bool(cell.to_owned())),
    }
}

/// Parse a 64-bit floating-point literal.
pub(crate) fn parse_float(cell: &str) -> Result<f64, ConvertError> {
    cell.parse()
        .map_err(|err| ConvertError::Float(cell.to_owned(), err))
}
