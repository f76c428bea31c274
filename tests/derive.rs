#![cfg(feature = "derive")]

use pretty_assertions::assert_eq;
use trestle::{Error, FromRow, decode_slice};

#[derive(Debug, Default, PartialEq, FromRow)]
struct TestRow {
    #[column("bool")]
    bool: bool,
    #[column("int")]
    int: i64,
    #[column("uint")]
    uint: u64,
    #[column("float")]
    float: f32,
    #[column("string")]
    string: String,
    #[column("文字列")]
    mojiretsu: String,
    #[column("custom", |ok, raw| {
        *ok = match raw {
            b"OK" => true,
            b"NG" => false,
            _ => return Err("neither OK nor NG".into()),
        };
        Ok(())
    })]
    custom: bool,
    #[column("escape")]
    escape: String,
    unbound: u8,
}

const TABLE: &str = r"

string  | custom || int   | float | bool  | uint | escape  | 文字列
------- | ------ || ----- | ----- | ----- | ---- | ------- | --------
abc     | OK     || 302   | 1.234 | true  | 7890 | abc\nd  | あいうえお
        | NG     || -0x20 | -5    | F     | 3333 | \|\\n\| | 日本語

ignored lines...

";

#[test]
fn decode_slice_fixture() {
    let mut rows: Vec<TestRow> = Vec::new();
    decode_slice(TABLE.as_bytes(), &mut rows).unwrap();

    let want = vec![
        TestRow {
            bool: true,
            int: 302,
            uint: 7890,
            float: 1.234,
            string: "abc".to_owned(),
            mojiretsu: "あいうえお".to_owned(),
            custom: true,
            escape: "abc\nd".to_owned(),
            unbound: 0,
        },
        TestRow {
            bool: false,
            int: -0x20,
            uint: 3333,
            float: -5.0,
            string: String::new(),
            mojiretsu: "日本語".to_owned(),
            custom: false,
            escape: "|\\n|".to_owned(),
            unbound: 0,
        },
    ];

    assert_eq!(rows, want);
}

#[test]
fn decode_merged_header() {
    #[derive(Debug, Default, PartialEq, FromRow)]
    struct Point {
        #[column("x")]
        x: i64,
        #[column("y")]
        y: i64,
    }

    let mut points: Vec<Point> = Vec::new();
    decode_slice(b"x|\n|y\n-|-\n1|2\n", &mut points).unwrap();
    assert_eq!(points, vec![Point { x: 1, y: 2 }]);
}

#[test]
fn decode_narrow_integers() {
    #[derive(Debug, Default, PartialEq, FromRow)]
    struct Narrow {
        #[column("a")]
        a: u8,
        #[column("b")]
        b: i16,
        #[column("c")]
        c: f64,
    }

    let mut rows: Vec<Narrow> = Vec::new();
    decode_slice(b"a|b|c\n-|-|-\n7|-3|0.5\n", &mut rows).unwrap();
    assert_eq!(rows, vec![Narrow { a: 7, b: -3, c: 0.5 }]);
}

#[test]
fn handler_error_aborts_the_row() {
    let table = TABLE.replace("NG", "XX");

    let mut rows: Vec<TestRow> = Vec::new();
    let err = decode_slice(table.as_bytes(), &mut rows).unwrap_err();

    assert!(matches!(err, Error::Custom { tag: "custom", .. }));
    assert_eq!(rows.len(), 1);
}

#[test]
fn missing_column_is_an_error() {
    #[derive(Debug, Default, PartialEq, FromRow)]
    struct Elsewhere {
        #[column("nowhere")]
        value: String,
    }

    let mut rows: Vec<Elsewhere> = Vec::new();
    let err = decode_slice(TABLE.as_bytes(), &mut rows).unwrap_err();
    assert!(matches!(err, Error::UnknownColumn("nowhere")));
}

#[test]
fn invalid_primitive_is_an_error() {
    let table = TABLE.replace("302", "not-a-number");

    let mut rows: Vec<TestRow> = Vec::new();
    let err = decode_slice(table.as_bytes(), &mut rows).unwrap_err();
    assert!(matches!(err, Error::Convert { tag: "int", .. }));
}
