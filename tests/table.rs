use std::{cell::Cell, io};

use pretty_assertions::assert_eq;
use trestle::{
    row::Row,
    table::{Table, TableError},
};

fn lines(text: &str) -> impl Iterator<Item = io::Result<String>> + '_ {
    text.lines().map(|line| Ok(line.to_owned()))
}

fn row(cells: &[&str]) -> Row {
    cells.iter().copied().collect()
}

fn structure(text: &str) -> Result<(Row, Vec<Row>), TableError> {
    let mut table = Table::new(lines(text))?;
    let header = table.header().clone();
    let rows = table.collect::<Result<_, _>>()?;
    Ok((header, rows))
}

#[test]
fn single_line_header() {
    let (header, rows) = structure("a|b\n-|-\n1|2\n").unwrap();
    assert_eq!(header, row(&["a", "b"]));
    assert_eq!(rows, vec![row(&["1", "2"])]);
}

#[test]
fn leading_blank_lines_are_skipped() {
    let (header, rows) = structure("\n\n \t \na|b\n-|-\n1|2\n").unwrap();
    assert_eq!(header, row(&["a", "b"]));
    assert_eq!(rows, vec![row(&["1", "2"])]);
}

#[test]
fn header_lines_merge_column_wise() {
    let (header, _) = structure("x|\n|y\n-|-\n").unwrap();
    assert_eq!(header, row(&["x", "y"]));

    let (header, _) = structure("dual  |a\nline  |\nheader|\n---|---\n").unwrap();
    assert_eq!(header, row(&["dual line header", "a"]));
}

#[test]
fn blank_line_ends_header() {
    let (header, rows) = structure("a|b\n\n1|2\n").unwrap();
    assert_eq!(header, row(&["a", "b"]));
    assert_eq!(rows, vec![row(&["1", "2"])]);
}

#[test]
fn continued_header_line_merges() {
    let (header, _) = structure("a|b\\\n|c\n-|-\n").unwrap();
    assert_eq!(header, row(&["a", "b c"]));
}

#[test]
fn leading_delimiter_yields_empty_header() {
    let (header, rows) = structure("-|-\n").unwrap();
    assert!(header.is_empty());
    assert!(rows.is_empty());

    // With no columns to match, any body content is a mismatch.
    let err = structure("---\n1|2\n").unwrap_err();
    assert!(matches!(err, TableError::ColumnCount { header: 0, row: 2 }));
}

#[test]
fn missing_header() {
    for text in ["", "\n \n\t\n"] {
        let err = Table::new(lines(text)).unwrap_err();
        assert!(matches!(err, TableError::MissingHeader), "input {text:?}");
    }
}

#[test]
fn header_merge_mismatch() {
    let err = Table::new(lines("a|b\nc\n")).unwrap_err();
    assert!(matches!(err, TableError::Merge(_)));
}

#[test]
fn unterminated_header_continuation() {
    for text in ["a|b\\\n", "a|b\\\n\n1|2\n"] {
        let err = Table::new(lines(text)).unwrap_err();
        assert!(matches!(err, TableError::UnterminatedRow), "input {text:?}");
    }
}

#[test]
fn body_delimiters_are_skipped() {
    let (_, rows) = structure("a|b\n-|-\n1|2\n-|-\n3|4\n").unwrap();
    assert_eq!(rows, vec![row(&["1", "2"]), row(&["3", "4"])]);
}

#[test]
fn mismatched_delimiter_is_still_skipped() {
    // Delimiter rows are discarded before the arity check, whatever their
    // column count.
    let (_, rows) = structure("a|b\n-|-\n---\n1|2\n").unwrap();
    assert_eq!(rows, vec![row(&["1", "2"])]);
}

#[test]
fn continued_body_rows_merge() {
    let (_, rows) = structure("a|b\n-|-\n1|2\\\n|3\n").unwrap();
    assert_eq!(rows, vec![row(&["1", "2 3"])]);

    let (_, rows) = structure("a|b\n-|-\n1|\\\n2|\\\n3|\n").unwrap();
    assert_eq!(rows, vec![row(&["1 2 3", ""])]);
}

#[test]
fn blank_line_ends_table() {
    let consumed = Cell::new(0);
    let text = "a|b\n-|-\n1|2\n\n3|4\n";
    let lines = text.lines().map(|line| {
        consumed.set(consumed.get() + 1);
        Ok(line.to_owned())
    });

    let mut table = Table::new(lines).unwrap();
    let rows: Vec<Row> = (&mut table).collect::<Result<_, _>>().unwrap();

    assert_eq!(rows, vec![row(&["1", "2"])]);
    assert!(table.next().is_none());

    // Lines past the terminating blank are left unconsumed.
    assert_eq!(consumed.get(), 4);
}

#[test]
fn unterminated_body_continuation() {
    for text in ["a|b\n-|-\n1|2\\\n", "a|b\n-|-\n1|2\\\n\n"] {
        let mut table = Table::new(lines(text)).unwrap();
        let err = table.next().unwrap().unwrap_err();
        assert!(matches!(err, TableError::UnterminatedRow), "input {text:?}");
    }
}

#[test]
fn body_arity_mismatch_ends_iteration() {
    let mut table = Table::new(lines("a|b\n-|-\n1\n2|3\n")).unwrap();

    let err = table.next().unwrap().unwrap_err();
    assert!(matches!(err, TableError::ColumnCount { header: 2, row: 1 }));
    assert!(table.next().is_none());
}

#[test]
fn line_source_errors_propagate() {
    let failing = std::iter::once(Err(io::Error::other("boom")));
    let err = Table::new(failing).unwrap_err();
    assert!(matches!(err, TableError::Io(_)));

    let mut table = Table::new(lines("a|b\n-|-\n").chain(std::iter::once(Err(io::Error::other("boom"))))).unwrap();
    let err = table.next().unwrap().unwrap_err();
    assert!(matches!(err, TableError::Io(_)));
}
