//! Lexing and parsing of individual table lines.
//!
//! A line is scanned one token at a time and assembled into a [`Row`] of
//! trimmed cells. Escape sequences are decoded here, so cells carry their
//! final text by the time they leave this module.

use std::{iter::Peekable, ops::Index, str::Chars};

use thiserror::Error;

/// An error scanning an unrecognized escape sequence.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized escape sequence {0:?}")]
pub struct EscapeError(pub String);

/// An error merging rows with differing column counts.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("column counts differ ({left} and {right})")]
pub struct MergeError {
    pub left: usize,
    pub right: usize,
}

/// A row of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(Vec<String>);

impl Row {
    /// The cells of this row, in column order.
    pub fn cells(&self) -> &[String] {
        &self.0
    }

    /// The cell at a column index, if within bounds.
    pub fn get(&self, column: usize) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// The number of columns in this row.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the first column whose cell equals `tag`.
    ///
    /// Cells are not required to be unique; later duplicates are never
    /// returned.
    pub fn find(&self, tag: &str) -> Option<usize> {
        self.0.iter().position(|cell| cell == tag)
    }

    /// Whether every trimmed cell consists only of `-` characters.
    ///
    /// Empty cells qualify, so a row of empty cells is a delimiter.
    pub fn is_delimiter(&self) -> bool {
        self.0.iter().all(|cell| trim(cell).chars().all(|c| c == '-'))
    }

    /// Merge another row into this one, column by column.
    ///
    /// Corresponding cells are joined with a single space when both are
    /// non-empty; otherwise the non-empty side is kept.
    pub fn merge(&mut self, other: Row) -> Result<(), MergeError> {
        if self.len() != other.len() {
            return Err(MergeError {
                left: self.len(),
                right: other.len(),
            });
        }

        for (cell, incoming) in self.0.iter_mut().zip(other.0) {
            if cell.is_empty() {
                *cell = incoming;
            } else if !incoming.is_empty() {
                cell.push(' ');
                cell.push_str(&incoming);
            }
        }

        Ok(())
    }
}

impl Index<usize> for Row {
    type Output = str;

    fn index(&self, column: usize) -> &str {
        &self.0[column]
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(cells: I) -> Self {
        Self(cells.into_iter().map(Into::into).collect())
    }
}

/// A single parsed line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedLine {
    /// The cells of the line, or `None` for a blank or whitespace-only line.
    ///
    /// A blank line is structurally distinct from a row holding one empty
    /// cell, and the two must not be conflated.
    pub row: Option<Row>,
    /// Whether the line ended in an unescaped `\`, continuing its row onto
    /// the next physical line.
    pub continues: bool,
}

/// Parse one line into its cells and continuation flag.
pub fn parse(line: &str) -> Result<ParsedLine, EscapeError> {
    let mut scanner = Scanner::new(line);
    let mut cells: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut continues = false;

    loop {
        match scanner.scan() {
            Token::Text(text) => cell.push_str(&text),
            Token::Pipe => {
                cells.push(trim(&cell).to_owned());
                cell.clear();
            }
            Token::EscapedBackslash => cell.push('\\'),
            Token::EscapedPipe => cell.push('|'),
            Token::EscapedNewline => cell.push('\n'),
            Token::Continuation => continues = true,
            Token::Illegal(sequence) => return Err(EscapeError(sequence)),
            Token::End => break,
        }
    }

    let last = trim(&cell);
    if cells.is_empty() && last.is_empty() {
        return Ok(ParsedLine {
            row: None,
            continues,
        });
    }

    cells.push(last.to_owned());

    Ok(ParsedLine {
        row: Some(Row(cells)),
        continues,
    })
}

/// A token scanned from a line.
#[derive(Debug, PartialEq, Eq)]
enum Token {
    /// A maximal run of characters containing no `|` or `\`.
    Text(String),
    /// An unescaped `|`, separating two cells.
    Pipe,
    /// `\\`, decoding to a literal backslash.
    EscapedBackslash,
    /// `\|`, decoding to a literal pipe.
    EscapedPipe,
    /// `\n`, decoding to a literal newline.
    EscapedNewline,
    /// A `\` at the end of the line, continuing the row.
    Continuation,
    /// An unrecognized two-character escape sequence.
    Illegal(String),
    /// The end of the line.
    End,
}

/// A scanner over one line, with a single character of lookahead.
struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            chars: line.chars().peekable(),
        }
    }

    fn scan(&mut self) -> Token {
        let Some(c) = self.chars.next() else {
            return Token::End;
        };

        match c {
            '|' => Token::Pipe,
            '\\' => match self.chars.next() {
                None => Token::Continuation,
                Some('\\') => Token::EscapedBackslash,
                Some('|') => Token::EscapedPipe,
                Some('n') => Token::EscapedNewline,
                Some(other) => Token::Illegal(format!("\\{other}")),
            },
            first => {
                let mut text = String::from(first);
                while let Some(&c) = self.chars.peek() {
                    if c == '|' || c == '\\' {
                        break;
                    }
                    text.push(c);
                    self.chars.next();
                }
                Token::Text(text)
            }
        }
    }
}

/// Trim horizontal whitespace from both ends of a cell.
///
/// Newlines produced by escape decoding are part of the cell's value and
/// must survive trimming.
fn trim(cell: &str) -> &str {
    cell.trim_matches(|c: char| c != '\n' && c.is_whitespace())
}
