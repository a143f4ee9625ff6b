use std::path::Path;

use crate::color::ColorMap;
use crate::data::aggregate::GroupOrder;
use crate::data::filter::{apply_selection, FilterSelection, Selector};
use crate::data::loader::load_bench_table;
use crate::data::model::{BenchTable, Metric, KNOWN_OPERATIONS, KNOWN_TREE_TYPES};
use crate::data::views::{ComparisonView, DatasetSummary, DerivedViews};
use crate::error::{ExportError, ParseError};
use crate::export::{export_charts, write_table_csv, ExportReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Timing,
    Structure,
    Comparison,
    Data,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Timing, Tab::Structure, Tab::Comparison, Tab::Data];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Timing => "Operation time",
            Tab::Structure => "Tree structure",
            Tab::Comparison => "Comparison",
            Tab::Data => "Data",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Cleaned table (None until user loads a file).  Never mutated after load.
    pub table: Option<BenchTable>,

    /// File name of the loaded table.
    pub source_name: Option<String>,

    /// Selector values being edited in the side panel.
    pub pending: FilterSelection,

    /// Selectors the current views were computed with.
    pub applied: FilterSelection,

    /// Metric used by the comparison tab.
    pub metric: Metric,

    /// Category order on chart axes.
    pub order: GroupOrder,

    /// Rows passing `applied` (cached).
    pub filtered: BenchTable,

    /// Aggregates drawn by the chart tabs (cached).
    pub views: DerivedViews,

    /// Summary of the whole table for the statistics window.
    pub summary: Option<DatasetSummary>,

    pub tree_colors: ColorMap,
    pub operation_colors: ColorMap,

    pub active_tab: Tab,

    pub show_stats: bool,

    /// Status line text.
    pub status_message: Option<String>,

    /// Whether the status line reports a failure.
    pub status_is_error: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            source_name: None,
            pending: FilterSelection::default(),
            applied: FilterSelection::default(),
            metric: Metric::AvgTimeNs,
            order: GroupOrder::default(),
            filtered: BenchTable::default(),
            views: DerivedViews::default(),
            summary: None,
            tree_colors: ColorMap::new(&vocabulary(&KNOWN_TREE_TYPES, &[])),
            operation_colors: ColorMap::new(&vocabulary(&KNOWN_OPERATIONS, &[])),
            active_tab: Tab::default(),
            show_stats: false,
            status_message: Some("Ready to load data".to_string()),
            status_is_error: false,
        }
    }
}

/// Known categories followed by any extra ones seen in the data.
fn vocabulary(known: &[&str], seen: &[String]) -> Vec<String> {
    let mut out: Vec<String> = known.iter().map(|s| s.to_string()).collect();
    for s in seen {
        if !out.contains(s) {
            out.push(s.clone());
        }
    }
    out
}

impl AppState {
    /// Ingest a newly loaded table and recompute every view.
    pub fn set_table(&mut self, table: BenchTable, source_name: String) {
        self.tree_colors = ColorMap::new(&self.tree_type_options_for(&table));
        self.operation_colors = ColorMap::new(&self.operation_options_for(&table));
        self.summary = Some(DatasetSummary::compute(&table));
        self.status_message = Some(format!("Loaded: {source_name} | Records: {}", table.len()));
        self.status_is_error = false;
        self.source_name = Some(source_name);
        self.table = Some(table);
        self.apply_filters();
    }

    /// Load a CSV file.  On failure the previous table is kept.
    pub fn load_file(&mut self, path: &Path) -> Result<(), ParseError> {
        match load_bench_table(path) {
            Ok(table) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                log::info!(
                    "Loaded {} records with tree types {:?}",
                    table.len(),
                    table.tree_types()
                );
                self.set_table(table, name);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.set_error(format!("Could not load file: {e}"));
                Err(e)
            }
        }
    }

    /// Commit the pending selectors and recompute filtered rows and views.
    pub fn apply_filters(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.applied = self.pending.clone();
        self.filtered = apply_selection(table, &self.applied);
        self.views = DerivedViews::compute(&self.filtered, self.metric, self.order);
        log::debug!(
            "Applied filters {} / {}: {} rows",
            self.applied.tree_type,
            self.applied.operation,
            self.filtered.len()
        );
    }

    /// Change the comparison metric; only the comparison view is rebuilt.
    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
        self.views.comparison = ComparisonView::compute(&self.filtered, metric, self.order);
    }

    /// Switch between first-appearance and alphabetical axes.
    pub fn set_order(&mut self, order: GroupOrder) {
        self.order = order;
        self.views = DerivedViews::compute(&self.filtered, self.metric, order);
    }

    pub fn set_tree_type(&mut self, selector: Selector) {
        self.pending.tree_type = selector;
    }

    pub fn set_operation(&mut self, selector: Selector) {
        self.pending.operation = selector;
    }

    pub fn tree_type_options(&self) -> Vec<String> {
        match &self.table {
            Some(t) => self.tree_type_options_for(t),
            None => vocabulary(&KNOWN_TREE_TYPES, &[]),
        }
    }

    pub fn operation_options(&self) -> Vec<String> {
        match &self.table {
            Some(t) => self.operation_options_for(t),
            None => vocabulary(&KNOWN_OPERATIONS, &[]),
        }
    }

    fn tree_type_options_for(&self, table: &BenchTable) -> Vec<String> {
        vocabulary(&KNOWN_TREE_TYPES, &table.tree_types())
    }

    fn operation_options_for(&self, table: &BenchTable) -> Vec<String> {
        vocabulary(&KNOWN_OPERATIONS, &table.operations())
    }

    /// Export every chart of the full table into `dir`.
    pub fn export_charts(&mut self, dir: &Path) -> Result<ExportReport, ExportError> {
        let Some(table) = &self.table else {
            self.set_error("No data to export".to_string());
            return Ok(ExportReport::default());
        };
        match export_charts(table, dir) {
            Ok(report) => {
                let mut msg = format!(
                    "Exported {} chart(s) to {}",
                    report.written.len(),
                    dir.display()
                );
                if !report.skipped.is_empty() {
                    let skipped: Vec<String> = report.skipped.iter().map(|m| m.to_string()).collect();
                    msg.push_str(&format!(" | skipped: {}", skipped.join(", ")));
                }
                self.status_message = Some(msg);
                self.status_is_error = false;
                Ok(report)
            }
            Err(e) => {
                log::error!("Chart export failed: {e:#}");
                self.set_error(format!("Could not export charts: {e}"));
                Err(e)
            }
        }
    }

    /// Write the filtered rows as CSV.
    pub fn export_filtered_csv(&mut self, path: &Path) -> Result<(), ExportError> {
        match write_table_csv(&self.filtered, path) {
            Ok(()) => {
                log::info!("Wrote {} rows to {}", self.filtered.len(), path.display());
                self.status_message = Some(format!("Saved {} rows to {}", self.filtered.len(), path.display()));
                self.status_is_error = false;
                Ok(())
            }
            Err(e) => {
                log::error!("Table export failed: {e:#}");
                self.set_error(format!("Could not save table: {e}"));
                Err(e)
            }
        }
    }

    fn set_error(&mut self, msg: String) {
        self.status_message = Some(msg);
        self.status_is_error = true;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::Record;

    fn rec(tree: &str, op: &str, avg: f64) -> Record {
        Record {
            tree_type: Some(tree.into()),
            operation: Some(op.into()),
            avg_time_ns: Some(avg),
            ..Record::default()
        }
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_table(
            BenchTable::new(vec![
                rec("AVL Tree", "Insertion", 100.0),
                rec("Treap", "Search", 50.0),
                rec("B-Tree", "Search", 10.0),
            ]),
            "bench.csv".into(),
        );
        state
    }

    #[test]
    fn set_table_applies_wildcards() {
        let state = loaded();
        assert_eq!(state.filtered.len(), 3);
        assert_eq!(state.views.timing.avg_time.get("Treap", "Search"), Some(50.0));
        assert!(state.summary.is_some());
    }

    #[test]
    fn pending_selection_waits_for_apply() {
        let mut state = loaded();
        state.set_tree_type(Selector::Only("Treap".into()));
        assert_eq!(state.filtered.len(), 3);
        state.apply_filters();
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.applied.tree_type, Selector::Only("Treap".into()));
        // The loaded table itself is untouched.
        assert_eq!(state.table.as_ref().map(BenchTable::len), Some(3));
    }

    #[test]
    fn metric_change_rebuilds_comparison_only() {
        let mut state = loaded();
        let timing = state.views.timing.clone();
        state.set_metric(Metric::Rotations);
        assert_eq!(state.views.comparison.metric, Some(Metric::Rotations));
        assert!(state.views.comparison.means.is_empty());
        assert_eq!(state.views.timing, timing);
    }

    #[test]
    fn order_toggle_recomputes_views() {
        let mut state = loaded();
        state.set_order(GroupOrder::Alphabetical);
        assert_eq!(state.views.timing.avg_time.rows, vec!["AVL Tree", "B-Tree", "Treap"]);
        state.set_order(GroupOrder::FirstAppearance);
        assert_eq!(state.views.timing.avg_time.rows, vec!["AVL Tree", "Treap", "B-Tree"]);
    }

    #[test]
    fn options_extend_known_vocabulary() {
        let state = loaded();
        let trees = state.tree_type_options();
        assert_eq!(&trees[..4], &KNOWN_TREE_TYPES.map(String::from));
        assert_eq!(trees.last().map(String::as_str), Some("B-Tree"));
        assert_eq!(state.operation_options().len(), 3);
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let mut state = loaded();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bad.csv");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "not;a;benchmark").expect("write");
        drop(file);

        assert!(state.load_file(&path).is_err());
        assert_eq!(state.table.as_ref().map(BenchTable::len), Some(3));
        assert!(state.status_is_error);
    }

    #[test]
    fn failed_table_save_returns_error_and_sets_status() {
        let mut state = loaded();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing_dir").join("out.csv");

        assert!(state.export_filtered_csv(&path).is_err());
        assert!(state.status_is_error);

        let ok = dir.path().join("out.csv");
        state.export_filtered_csv(&ok).expect("save");
        assert!(!state.status_is_error);
    }

    #[test]
    fn export_without_data_is_reported() {
        let mut state = AppState::default();
        let dir = tempfile::tempdir().expect("temp dir");
        let report = state.export_charts(dir.path()).expect("export");
        assert!(report.written.is_empty());
        assert!(state.status_is_error);
    }
}
