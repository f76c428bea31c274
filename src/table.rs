//! Structuring of lines into a header and a sequence of body rows.
//!
//! A table is read in two phases over a single line source. Constructing a
//! [`Table`] consumes leading blank lines and the header block, up to and
//! including the delimiter or blank line that ends it. Iterating then yields
//! finalized body rows, with continuations merged and delimiter rows
//! filtered out, until the table ends at a blank line or the end of input.

use std::io;

use thiserror::Error;

use crate::row::{self, EscapeError, MergeError, Row};

/// Errors occurring while structuring a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// An error from the line source.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A line held an unrecognized escape sequence.
    #[error(transparent)]
    Escape(#[from] EscapeError),
    /// The input ended before any header content.
    #[error("no header found")]
    MissingHeader,
    /// Two merged lines had differing column counts.
    #[error(transparent)]
    Merge(#[from] MergeError),
    /// A body row's column count did not match the header's.
    #[error("header has {header} columns but row has {row}")]
    ColumnCount { header: usize, row: usize },
    /// A row continued past the end of the table.
    #[error("row continues but the table ended")]
    UnterminatedRow,
}

/// A table being decoded from a line source.
///
/// The line source must strip line terminators, as [`BufRead::lines`] and
/// [`str::lines`] do.
///
/// [`BufRead::lines`]: std::io::BufRead::lines
pub struct Table<L> {
    lines: L,
    header: Row,
    pending: Option<Row>,
    done: bool,
}

impl<L> std::fmt::Debug for Table<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("header", &self.header)
            .field("pending", &self.pending)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<L> Table<L>
where
    L: Iterator<Item = io::Result<String>>,
{
    /// Read the header from a line source.
    ///
    /// Blank lines above the table are skipped. Header lines are merged
    /// column-wise until a delimiter row or a blank line, letting a tag span
    /// multiple physical lines. A delimiter before any header content ends
    /// the header immediately, with zero columns.
    pub fn new(mut lines: L) -> Result<Self, TableError> {
        let (mut header, mut continues) = loop {
            let Some(line) = lines.next().transpose()? else {
                return Err(TableError::MissingHeader);
            };

            let parsed = row::parse(&line)?;
            if let Some(row) = parsed.row {
                break (row, parsed.continues);
            }
        };

        if header.is_delimiter() && !continues {
            return Ok(Self {
                lines,
                header: Row::default(),
                pending: None,
                done: false,
            });
        }

        loop {
            let Some(line) = lines.next().transpose()? else {
                if continues {
                    return Err(TableError::UnterminatedRow);
                }
                break;
            };

            let parsed = row::parse(&line)?;
            let Some(row) = parsed.row else {
                if continues {
                    return Err(TableError::UnterminatedRow);
                }
                break;
            };

            // A continued row claims the next line, even a delimiter-shaped
            // one.
            if row.is_delimiter() && !continues {
                break;
            }

            header.merge(row)?;
            continues = parsed.continues;
        }

        Ok(Self {
            lines,
            header,
            pending: None,
            done: false,
        })
    }

    /// The merged header row.
    pub fn header(&self) -> &Row {
        &self.header
    }
}

impl<L> Iterator for Table<L>
where
    L: Iterator<Item = io::Result<String>>,
{
    type Item = Result<Row, TableError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) => return self.fail(err.into()),
                None => {
                    self.done = true;
                    if self.pending.is_some() {
                        return Some(Err(TableError::UnterminatedRow));
                    }
                    return None;
                }
            };

            let parsed = match row::parse(&line) {
                Ok(parsed) => parsed,
                Err(err) => return self.fail(err.into()),
            };

            let Some(row) = parsed.row else {
                self.done = true;
                if self.pending.is_some() {
                    return Some(Err(TableError::UnterminatedRow));
                }
                // The table ends here; remaining lines are left unconsumed.
                return None;
            };

            let row = match self.pending.take() {
                Some(mut pending) => {
                    if let Err(err) = pending.merge(row) {
                        return self.fail(err.into());
                    }
                    if parsed.continues {
                        self.pending = Some(pending);
                        continue;
                    }
                    pending
                }
                None => {
                    if row.is_delimiter() && !parsed.continues {
                        continue;
                    }
                    if parsed.continues {
                        self.pending = Some(row);
                        continue;
                    }
                    row
                }
            };

            if row.len() != self.header.len() {
                return self.fail(TableError::ColumnCount {
                    header: self.header.len(),
                    row: row.len(),
                });
            }

            return Some(Ok(row));
        }
    }
}

impl<L> Table<L> {
    /// End iteration with an error.
    fn fail(&mut self, err: TableError) -> Option<Result<Row, TableError>> {
        self.done = true;
        Some(Err(err))
    }
}
