use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, Trim};

use super::clean::clean;
use super::model::{BenchTable, Cell, RawTable, REQUIRED_COLUMNS};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load, clean and type a benchmark CSV in one step.
pub fn load_bench_table(path: &Path) -> Result<BenchTable, ParseError> {
    let raw = load_file(path)?;
    let cleaned = clean(&raw);
    log::debug!(
        "Cleaned {}: {} raw rows -> {} rows",
        path.display(),
        raw.len(),
        cleaned.len()
    );
    if cleaned.is_empty() {
        log::warn!("{} contains no data rows", path.display());
    }
    Ok(BenchTable::from_raw(&cleaned))
}

/// Parse a `;`-delimited benchmark CSV from disk.
/// The file handle lives only for the duration of this call.
pub fn load_file(path: &Path) -> Result<RawTable, ParseError> {
    let file = std::fs::File::open(path).map_err(|e| ParseError::Open {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    parse_reader(file)
}

/// Parse `;`-delimited text with a header row.
///
/// Expected layout (column order is irrelevant, names must match):
///
/// ```text
/// TreeType;Operation;DataSize;TotalTimeNs;AvgTimeNs;FinalHeight;FinalNodes;Rotations
/// AVL Tree;Insertion;1000;523000;523;11;1000;702
/// ```
///
/// Fields are trimmed and typed with [`Cell::guess`].  Bytes that are not valid
/// UTF-8 are decoded lossily so files saved in a legacy code page still load.
pub fn parse_reader<R: Read>(reader: R) -> Result<RawTable, ParseError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let row: Vec<Cell> = record
            .iter()
            .map(|field| Cell::guess(&String::from_utf8_lossy(field)))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str =
        "TreeType;Operation;DataSize;TotalTimeNs;AvgTimeNs;FinalHeight;FinalNodes;Rotations";

    #[test]
    fn parses_semicolon_delimited_rows() {
        let text = format!("{HEADER}\nAVL Tree;Insertion;1000;523000;523;11;1000;702\n");
        let raw = parse_reader(text.as_bytes()).expect("parse");
        assert_eq!(raw.headers.len(), 8);
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.rows[0][0], Cell::Text("AVL Tree".into()));
        assert_eq!(raw.rows[0][4], Cell::Integer(523));
    }

    #[test]
    fn column_order_is_irrelevant() {
        let text = "Rotations;FinalNodes;FinalHeight;AvgTimeNs;TotalTimeNs;DataSize;Operation;TreeType\n\
                    3;100;7;12.5;1250;100;Search;Treap\n";
        let raw = parse_reader(text.as_bytes()).expect("parse");
        let table = BenchTable::from_raw(&raw);
        assert_eq!(table.records[0].tree_type.as_deref(), Some("Treap"));
        assert_eq!(table.records[0].avg_time_ns, Some(12.5));
    }

    #[test]
    fn missing_header_is_a_parse_error() {
        let text = "TreeType;Operation;DataSize\nTreap;Search;10\n";
        match parse_reader(text.as_bytes()) {
            Err(ParseError::MissingColumns(cols)) => {
                assert!(cols.contains(&"AvgTimeNs".to_string()));
                assert!(!cols.contains(&"TreeType".to_string()));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_reports_missing_columns() {
        assert!(matches!(
            parse_reader("".as_bytes()),
            Err(ParseError::MissingColumns(_))
        ));
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let text = format!("{HEADER}\nAVL Tree;Insertion;1000\n");
        assert!(matches!(
            parse_reader(text.as_bytes()),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn lossy_decoding_keeps_legacy_bytes() {
        let mut bytes = format!("{HEADER}\n").into_bytes();
        bytes.extend_from_slice(b"Tr\xe9ap;Search;1;2;3;4;5;6\n");
        let raw = parse_reader(bytes.as_slice()).expect("parse");
        assert!(matches!(&raw.rows[0][0], Cell::Text(s) if s.starts_with("Tr")));
    }

    #[test]
    fn unreadable_path_is_open_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.csv");
        assert!(matches!(load_file(&path), Err(ParseError::Open { .. })));
    }

    #[test]
    fn integer_and_decimal_spellings_load_as_one_row() {
        let text = format!(
            "{HEADER}\nTreap;Search;5;50;10;4;5;0\nTreap;Search;5.0;50.0;10;4.0;5;0\n"
        );
        let raw = parse_reader(text.as_bytes()).expect("parse");
        let table = BenchTable::from_raw(&clean(&raw));
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].data_size, Some(5.0));
    }

    #[test]
    fn one_duplicate_pair_among_three_rows_loads_as_two() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bench.csv");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "{HEADER}").expect("write");
        writeln!(file, "AVL Tree;Insertion;1000;523000;523;11;1000;702").expect("write");
        writeln!(file, "AVL Tree;Insertion;1000;523000;523;11;1000;702").expect("write");
        writeln!(file, "2-3 Tree;Insertion;1000;611000;611;7;1000;-858993460").expect("write");
        drop(file);

        let table = load_bench_table(&path).expect("load");
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1].rotations, None);
        assert_eq!(table.records[1].final_height, Some(7.0));
    }
}
