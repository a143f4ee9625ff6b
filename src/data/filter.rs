use std::fmt;

use super::model::{BenchTable, Record};

// ---------------------------------------------------------------------------
// Selector: wildcard or one exact category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("All"),
            Selector::Only(v) => f.write_str(v),
        }
    }
}

/// The pair of selectors applied together by the "Apply filters" action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub tree_type: Selector,
    pub operation: Selector,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

fn passes(record: &Record, tree_type: &Selector, operation: &Selector) -> bool {
    tree_type.matches(record.tree_type.as_deref()) && operation.matches(record.operation.as_deref())
}

/// Return indices of records that pass both selectors.
///
/// A record passes when:
/// * the selector is `All` → no constraint for that column
/// * the selector is `Only(v)` → the column equals `v` exactly; a missing
///   value never matches
pub fn filtered_indices(table: &BenchTable, tree_type: &Selector, operation: &Selector) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| passes(rec, tree_type, operation))
        .map(|(i, _)| i)
        .collect()
}

/// Build a new table from the records that pass both selectors.
/// An empty result is a valid, empty table.
pub fn filter(table: &BenchTable, tree_type: &Selector, operation: &Selector) -> BenchTable {
    BenchTable::new(
        filtered_indices(table, tree_type, operation)
            .into_iter()
            .map(|i| table.records[i].clone())
            .collect(),
    )
}

pub fn apply_selection(table: &BenchTable, selection: &FilterSelection) -> BenchTable {
    filter(table, &selection.tree_type, &selection.operation)
}
