//! A decoder for pipe-delimited text tables into typed records.
//!
//! Tables are written in the style of lightweight markup languages:
//!
//! ```text
//! string  | custom | int   | float | bool  | uint | escape
//! ------- | ------ | ----- | ----- | ----- | ---- | -------
//! abc     | OK     | 302   | 1.234 | true  | 7890 | abc\nd
//!         | NG     | -0x20 | -5    | F     | 3333 | \|\\n\|
//! ```
//!
//! Cells are separated by `|`, and a row filled with `-` is a delimiter,
//! recognized and discarded. Blank lines above the header are ignored, and
//! the table ends at the first blank line. The escape sequences `\\`, `\|`,
//! and `\n` decode to a backslash, a pipe, and a newline; a line ending in a
//! single unescaped `\` continues its row onto the next physical line, with
//! the two lines' cells joined column by column. A header tag may likewise
//! span several physical lines, merged the same way.
//!
//! Most users should begin with [`decode_slice`] or [`decode_reader`] and
//! the [`FromRow`](macro@record::FromRow) derive macro, collecting records
//! into a `Vec`. The pipeline's stages are also usable on their own:
//! [`row::parse`] handles a single line, and [`table::Table`] structures a
//! line source into a header and body rows.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).

pub mod decode;
pub mod record;
pub mod row;
pub mod table;
pub mod value;

pub use decode::{Error, decode_reader, decode_slice};
pub use record::{Column, CustomError, FromRow, FromRows, Kind};
pub use row::Row;
