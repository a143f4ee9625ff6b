use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Schema constants
// ---------------------------------------------------------------------------

/// Uninitialised-memory pattern written by the benchmark harness in place of a
/// real measurement.  Always treated as missing.
pub const SENTINEL: i64 = -858_993_460;

pub const TREE_TYPE_COLUMN: &str = "TreeType";
pub const OPERATION_COLUMN: &str = "Operation";

/// Every column a benchmark CSV must carry, in the order the harness writes them.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "TreeType",
    "Operation",
    "DataSize",
    "TotalTimeNs",
    "AvgTimeNs",
    "FinalHeight",
    "FinalNodes",
    "Rotations",
];

/// Tree types produced by the benchmark harness.  Loaded files may add more.
pub const KNOWN_TREE_TYPES: [&str; 4] = ["AVL Tree", "AA Tree", "Treap", "2-3 Tree"];

pub const KNOWN_OPERATIONS: [&str; 3] = ["Insertion", "Search", "Deletion"];

pub const INSERTION: &str = "Insertion";

// ---------------------------------------------------------------------------
// Cell – a single value of the raw table
// ---------------------------------------------------------------------------

/// A dynamically-typed CSV cell.
/// Rows are de-duplicated through a `HashSet`, so `Cell` must be `Eq + Hash`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Missing,
}

// NaN never reaches a `Cell` (see `guess`), so float equality is total here.
impl Eq for Cell {}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Text(s) => s.hash(state),
            Cell::Integer(i) => i.hash(state),
            Cell::Float(f) => {
                // 0.0 == -0.0
                let bits = if *f == 0.0 { 0 } else { f.to_bits() };
                bits.hash(state)
            }
            Cell::Missing => {}
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Missing => Ok(()),
        }
    }
}

impl Cell {
    /// Type a raw CSV field: integer, then float, then text.
    /// Empty fields and `NaN` are missing.
    pub fn guess(s: &str) -> Cell {
        if s.is_empty() {
            return Cell::Missing;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Cell::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_nan() {
                return Cell::Missing;
            }
            return Cell::Float(f);
        }
        Cell::Text(s.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text form of a categorical cell; `None` when missing.
    pub fn as_category(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        match self {
            Cell::Integer(i) => *i == SENTINEL,
            Cell::Float(f) => *f == SENTINEL as f64,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – the parsed CSV before typing
// ---------------------------------------------------------------------------

/// Parsed delimited text: header names plus typed cells, one `Vec` per row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Metric – the numeric columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    DataSize,
    TotalTimeNs,
    AvgTimeNs,
    FinalHeight,
    FinalNodes,
    Rotations,
}

impl Metric {
    /// All numeric columns, in file order.
    pub const ALL: [Metric; 6] = [
        Metric::DataSize,
        Metric::TotalTimeNs,
        Metric::AvgTimeNs,
        Metric::FinalHeight,
        Metric::FinalNodes,
        Metric::Rotations,
    ];

    /// Metrics offered in the comparison selector.
    pub const SELECTABLE: [Metric; 5] = [
        Metric::AvgTimeNs,
        Metric::TotalTimeNs,
        Metric::FinalHeight,
        Metric::FinalNodes,
        Metric::Rotations,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            Metric::DataSize => "DataSize",
            Metric::TotalTimeNs => "TotalTimeNs",
            Metric::AvgTimeNs => "AvgTimeNs",
            Metric::FinalHeight => "FinalHeight",
            Metric::FinalNodes => "FinalNodes",
            Metric::Rotations => "Rotations",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.column_name() == name)
    }

    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            Metric::DataSize => record.data_size,
            Metric::TotalTimeNs => record.total_time_ns,
            Metric::AvgTimeNs => record.avg_time_ns,
            Metric::FinalHeight => record.final_height,
            Metric::FinalNodes => record.final_nodes,
            Metric::Rotations => record.rotations,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// Record – one benchmark measurement
// ---------------------------------------------------------------------------

/// One row of the cleaned table.  `None` means missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Record {
    #[serde(rename = "TreeType")]
    pub tree_type: Option<String>,
    #[serde(rename = "Operation")]
    pub operation: Option<String>,
    #[serde(rename = "DataSize")]
    pub data_size: Option<f64>,
    #[serde(rename = "TotalTimeNs")]
    pub total_time_ns: Option<f64>,
    #[serde(rename = "AvgTimeNs")]
    pub avg_time_ns: Option<f64>,
    #[serde(rename = "FinalHeight")]
    pub final_height: Option<f64>,
    #[serde(rename = "FinalNodes")]
    pub final_nodes: Option<f64>,
    #[serde(rename = "Rotations")]
    pub rotations: Option<f64>,
}

// ---------------------------------------------------------------------------
// BenchTable – the typed, cleaned dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BenchTable {
    pub records: Vec<Record>,
}

impl BenchTable {
    pub fn new(records: Vec<Record>) -> Self {
        BenchTable { records }
    }

    /// Project a cleaned raw table onto the fixed schema.
    /// Columns absent from the table read as missing; extra columns are ignored.
    pub fn from_raw(raw: &RawTable) -> Self {
        let tree_idx = raw.column_index(TREE_TYPE_COLUMN);
        let op_idx = raw.column_index(OPERATION_COLUMN);
        let metric_idx: Vec<(Metric, Option<usize>)> = Metric::ALL
            .iter()
            .map(|&m| (m, raw.column_index(m.column_name())))
            .collect();

        let cell = |row: &[Cell], idx: Option<usize>| -> Option<Cell> {
            idx.and_then(|i| row.get(i)).cloned()
        };

        let records = raw
            .rows
            .iter()
            .map(|row| {
                let mut rec = Record {
                    tree_type: cell(row, tree_idx).and_then(|c| c.as_category()),
                    operation: cell(row, op_idx).and_then(|c| c.as_category()),
                    ..Record::default()
                };
                for &(metric, idx) in &metric_idx {
                    let value = cell(row, idx).and_then(|c| c.as_f64());
                    let slot = match metric {
                        Metric::DataSize => &mut rec.data_size,
                        Metric::TotalTimeNs => &mut rec.total_time_ns,
                        Metric::AvgTimeNs => &mut rec.avg_time_ns,
                        Metric::FinalHeight => &mut rec.final_height,
                        Metric::FinalNodes => &mut rec.final_nodes,
                        Metric::Rotations => &mut rec.rotations,
                    };
                    *slot = value;
                }
                rec
            })
            .collect();

        BenchTable { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct tree types in first-appearance order.
    pub fn tree_types(&self) -> Vec<String> {
        distinct(self.records.iter().filter_map(|r| r.tree_type.as_deref()))
    }

    /// Distinct operations in first-appearance order.
    pub fn operations(&self) -> Vec<String> {
        distinct(self.records.iter().filter_map(|r| r.operation.as_deref()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Format a measurement for tables and labels: integers without decimals.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_types_cells() {
        assert_eq!(Cell::guess(""), Cell::Missing);
        assert_eq!(Cell::guess("NaN"), Cell::Missing);
        assert_eq!(Cell::guess("42"), Cell::Integer(42));
        assert_eq!(Cell::guess("1.5"), Cell::Float(1.5));
        assert_eq!(Cell::guess("AVL Tree"), Cell::Text("AVL Tree".into()));
    }

    #[test]
    fn sentinel_detected_in_integer_and_float_cells() {
        assert!(Cell::Integer(SENTINEL).is_sentinel());
        assert!(Cell::Float(-858993460.0).is_sentinel());
        assert!(!Cell::Text("-858993460".into()).is_sentinel());
        assert!(!Cell::Integer(0).is_sentinel());
    }

    #[test]
    fn from_raw_maps_columns_by_name() {
        let raw = RawTable {
            headers: vec![
                "AvgTimeNs".into(),
                "TreeType".into(),
                "Operation".into(),
                "Extra".into(),
            ],
            rows: vec![vec![
                Cell::Float(12.5),
                Cell::Text("Treap".into()),
                Cell::Missing,
                Cell::Integer(9),
            ]],
        };
        let table = BenchTable::from_raw(&raw);
        assert_eq!(table.len(), 1);
        let rec = &table.records[0];
        assert_eq!(rec.tree_type.as_deref(), Some("Treap"));
        assert_eq!(rec.operation, None);
        assert_eq!(rec.avg_time_ns, Some(12.5));
        assert_eq!(rec.data_size, None);
    }

    #[test]
    fn distinct_categories_keep_first_appearance() {
        let rec = |t: &str, o: &str| Record {
            tree_type: Some(t.into()),
            operation: Some(o.into()),
            ..Record::default()
        };
        let table = BenchTable::new(vec![
            rec("Treap", "Search"),
            rec("AVL Tree", "Insertion"),
            rec("Treap", "Insertion"),
        ]);
        assert_eq!(table.tree_types(), vec!["Treap", "AVL Tree"]);
        assert_eq!(table.operations(), vec!["Search", "Insertion"]);
    }

    #[test]
    fn format_value_drops_integer_decimals() {
        assert_eq!(format_value(Some(150.0)), "150");
        assert_eq!(format_value(Some(1.234)), "1.23");
        assert_eq!(format_value(None), "");
    }
}
