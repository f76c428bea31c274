//! Decoding entry points.
//!
//! The functions in this module drive the full pipeline: structure the input
//! into a header and body rows, bind the header to the destination's
//! declared columns, and decode each body row into one record.

use std::{io::BufRead, str};

use thiserror::Error;

use crate::{
    record::{Column, CustomError, FromRow, FromRows, Kind},
    row::Row,
    table::{Table, TableError},
    value::{self, ConvertError},
};

/// Errors occurring while decoding a table.
#[derive(Debug, Error)]
pub enum Error {
    /// The input is not valid UTF-8.
    #[error("input is not valid UTF-8")]
    Utf8(#[from] str::Utf8Error),
    /// The table's structure is malformed.
    #[error(transparent)]
    Table(#[from] TableError),
    /// A bound column's tag was not found in the header.
    #[error("column {0:?} not found in header")]
    UnknownColumn(&'static str),
    /// A cell failed to convert to its column's kind.
    #[error("decode column {tag:?}: {source}")]
    Convert {
        tag: &'static str,
        #[source]
        source: ConvertError,
    },
    /// A custom column decoder failed.
    #[error("decode column {tag:?}: {source}")]
    Custom {
        tag: &'static str,
        #[source]
        source: CustomError,
    },
}

/// Decode records from a buffer of table text, appending to a collection.
///
/// This function is also re-exported as [`trestle::decode_slice`](crate::decode_slice).
pub fn decode_slice<D: FromRows>(data: &[u8], out: &mut D) -> Result<(), Error> {
    let text = str::from_utf8(data)?;
    decode(text.lines().map(|line| Ok(line.to_owned())), out)
}

/// Decode records from a reader of table text, appending to a collection.
///
/// This function is also re-exported as [`trestle::decode_reader`](crate::decode_reader).
pub fn decode_reader<D: FromRows>(reader: impl BufRead, out: &mut D) -> Result<(), Error> {
    decode(reader.lines(), out)
}

fn decode<D: FromRows>(
    lines: impl Iterator<Item = std::io::Result<String>>,
    out: &mut D,
) -> Result<(), Error> {
    let mut table = Table::new(lines)?;
    let map = bind(table.header(), D::Record::columns())?;

    for row in &mut table {
        out.append(decode_row(&map, &row?)?);
    }

    Ok(())
}

/// Map each declared column to its index in the header.
///
/// Computed once per decode call and reused for every body row. An empty tag
/// leaves its column unbound; a tag absent from the header is an error.
fn bind(header: &Row, columns: &[Column]) -> Result<Vec<Option<usize>>, Error> {
    columns
        .iter()
        .map(|column| {
            if column.tag.is_empty() {
                return Ok(None);
            }
            header
                .find(column.tag)
                .map(Some)
                .ok_or(Error::UnknownColumn(column.tag))
        })
        .collect()
}

/// Decode one body row into a record.
///
/// Decoding is all-or-nothing: the first failing column discards the row and
/// propagates its error.
fn decode_row<T: FromRow>(map: &[Option<usize>], row: &Row) -> Result<T, Error> {
    let mut record = T::default();

    for (index, (column, at)) in T::columns().iter().zip(map).enumerate() {
        let Some(at) = *at else {
            continue;
        };

        let cell = &row[at];
        let convert = |source| Error::Convert {
            tag: column.tag,
            source,
        };

        match column.kind {
            Kind::String => record.set_string(index, cell),
            Kind::Int => record.set_int(index, value::parse_int(cell).map_err(convert)?),
            Kind::Uint => record.set_uint(index, value::parse_uint(cell).map_err(convert)?),
            Kind::Bool => record.set_bool(index, value::parse_bool(cell).map_err(convert)?),
            Kind::Float => record.set_float(index, value::parse_float(cell).map_err(convert)?),
            Kind::Custom => {
                record
                    .set_custom(index, cell.as_bytes())
                    .map_err(|source| Error::Custom {
                        tag: column.tag,
                        source,
                    })?;
            }
        }
    }

    Ok(record)
}
