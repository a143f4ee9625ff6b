use std::collections::HashSet;

use super::model::{Cell, Metric, RawTable};

/// Clean a freshly parsed table.  Never fails and never mutates its input.
///
/// * Every sentinel cell becomes [`Cell::Missing`].
/// * Numeric columns are coerced to `Float`: parsable text becomes a number,
///   anything else becomes missing.
/// * Exact duplicate rows collapse to their first occurrence.
///
/// Duplicates are detected on the normalised rows, so `clean` is idempotent.
pub fn clean(raw: &RawTable) -> RawTable {
    let numeric: Vec<bool> = raw
        .headers
        .iter()
        .map(|h| Metric::from_column_name(h).is_some())
        .collect();

    let mut seen: HashSet<Vec<Cell>> = HashSet::with_capacity(raw.rows.len());
    let mut rows = Vec::with_capacity(raw.rows.len());

    for row in &raw.rows {
        let normalised: Vec<Cell> = row
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let cell = replace_sentinel(cell);
                if numeric.get(idx).copied().unwrap_or(false) {
                    coerce_numeric(cell)
                } else {
                    cell
                }
            })
            .collect();

        if seen.insert(normalised.clone()) {
            rows.push(normalised);
        }
    }

    RawTable {
        headers: raw.headers.clone(),
        rows,
    }
}

fn replace_sentinel(cell: &Cell) -> Cell {
    if cell.is_sentinel() {
        Cell::Missing
    } else {
        cell.clone()
    }
}

/// Numeric columns end up as `Float` or `Missing`, so `5`, `5.0` and ` 5 `
/// compare equal during de-duplication.
fn coerce_numeric(cell: Cell) -> Cell {
    let coerced = match cell {
        Cell::Text(s) => Cell::guess(s.trim()),
        other => other,
    };
    match replace_sentinel(&coerced) {
        // -0.0 folds into 0.0
        Cell::Float(v) if v == 0.0 => Cell::Float(0.0),
        Cell::Float(v) => Cell::Float(v),
        Cell::Integer(i) => Cell::Float(i as f64),
        _ => Cell::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{BenchTable, SENTINEL};

    fn headers() -> Vec<String> {
        ["TreeType", "Operation", "DataSize", "AvgTimeNs"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn sentinel_never_survives() {
        let raw = RawTable {
            headers: headers(),
            rows: vec![
                vec![text("AVL Tree"), text("Insertion"), Cell::Integer(SENTINEL), Cell::Float(10.0)],
                vec![text("Treap"), text("Search"), Cell::Integer(100), Cell::Float(-858993460.0)],
                vec![text("AA Tree"), text("Search"), text(" -858993460 "), Cell::Integer(5)],
            ],
        };
        let cleaned = clean(&raw);
        assert!(cleaned
            .rows
            .iter()
            .flatten()
            .all(|c| !c.is_sentinel()));
        assert_eq!(cleaned.rows[0][2], Cell::Missing);
        assert_eq!(cleaned.rows[1][3], Cell::Missing);
        assert_eq!(cleaned.rows[2][2], Cell::Missing);
    }

    #[test]
    fn sentinel_data_size_is_excluded_downstream() {
        let raw = RawTable {
            headers: headers(),
            rows: vec![vec![
                text("AVL Tree"),
                text("Insertion"),
                Cell::Integer(SENTINEL),
                Cell::Integer(1),
            ]],
        };
        let table = BenchTable::from_raw(&clean(&raw));
        assert_eq!(table.records[0].data_size, None);
    }

    #[test]
    fn duplicates_collapse_to_first() {
        let row = vec![text("Treap"), text("Search"), Cell::Integer(10), Cell::Float(2.5)];
        let other = vec![text("Treap"), text("Deletion"), Cell::Integer(10), Cell::Float(2.5)];
        let raw = RawTable {
            headers: headers(),
            rows: vec![row.clone(), other.clone(), row.clone()],
        };
        let cleaned = clean(&raw);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.rows[0][1], text("Search"));
        assert_eq!(cleaned.rows[1][1], text("Deletion"));
        assert_eq!(cleaned.rows[0][2], Cell::Float(10.0));
    }

    #[test]
    fn integer_and_float_spellings_are_duplicates() {
        let raw = RawTable {
            headers: headers(),
            rows: vec![
                vec![text("AVL Tree"), text("Insertion"), Cell::Integer(5), Cell::Float(0.0)],
                vec![text("AVL Tree"), text("Insertion"), Cell::Float(5.0), Cell::Float(-0.0)],
                vec![text("AVL Tree"), text("Insertion"), text("5.0"), Cell::Integer(0)],
            ],
        };
        let table = BenchTable::from_raw(&clean(&raw));
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].data_size, Some(5.0));
    }

    #[test]
    fn rows_equal_after_sentinel_replacement_are_duplicates() {
        let raw = RawTable {
            headers: headers(),
            rows: vec![
                vec![text("Treap"), text("Search"), Cell::Integer(SENTINEL), Cell::Integer(1)],
                vec![text("Treap"), text("Search"), Cell::Missing, Cell::Integer(1)],
            ],
        };
        assert_eq!(clean(&raw).len(), 1);
    }

    #[test]
    fn coercion_is_total() {
        let raw = RawTable {
            headers: headers(),
            rows: vec![
                vec![text("Treap"), text("Search"), text("n/a"), text(" 12.5")],
                vec![text("Treap"), text("Deletion"), text("oops"), Cell::Integer(3)],
            ],
        };
        let cleaned = clean(&raw);
        for row in &cleaned.rows {
            for cell in &row[2..] {
                assert!(matches!(cell, Cell::Float(_) | Cell::Missing));
            }
        }
        assert_eq!(cleaned.rows[0][2], Cell::Missing);
        assert_eq!(cleaned.rows[0][3], Cell::Float(12.5));
    }

    #[test]
    fn categorical_columns_are_untouched() {
        let raw = RawTable {
            headers: headers(),
            rows: vec![vec![text("2-3 Tree"), text("Insertion"), Cell::Integer(1), Cell::Integer(2)]],
        };
        assert_eq!(clean(&raw).rows[0][0], text("2-3 Tree"));
    }

    #[test]
    fn clean_is_idempotent() {
        let raw = RawTable {
            headers: headers(),
            rows: vec![
                vec![text("AVL Tree"), text("Insertion"), text("abc"), Cell::Integer(100)],
                vec![text("AVL Tree"), text("Insertion"), text("xyz"), Cell::Integer(100)],
                vec![text("AVL Tree"), text("Insertion"), Cell::Integer(SENTINEL), Cell::Integer(100)],
                vec![text("Treap"), text("Search"), text(" 7 "), Cell::Float(1.5)],
                vec![text("Treap"), text("Search"), Cell::Integer(7), Cell::Float(1.5)],
            ],
        };
        let once = clean(&raw);
        let twice = clean(&once);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn clean_never_grows_and_leaves_input_alone() {
        let raw = RawTable {
            headers: headers(),
            rows: vec![vec![text("Treap"), text("Search"), Cell::Integer(SENTINEL), Cell::Integer(1)]],
        };
        let before = raw.clone();
        let cleaned = clean(&raw);
        assert!(cleaned.len() <= raw.len());
        assert_eq!(raw, before);
    }
}
