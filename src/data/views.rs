use super::aggregate::{
    correlation_matrix, pivot_mean, pivot_sum, points_by_tree_type, stats_by_tree_type,
    values_by_operation, Accumulator, BoxStats, CorrelationMatrix, CrossTab, GroupOrder, GroupStats,
};
use super::filter::{filter, Selector};
use super::model::{BenchTable, Metric, INSERTION};

// ---------------------------------------------------------------------------
// Derived views: everything the chart tabs draw, rebuilt on every apply
// ---------------------------------------------------------------------------

/// "Operation time" tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingViews {
    pub avg_time: CrossTab,
    pub total_time: CrossTab,
    /// AvgTimeNs five-number summary per operation; operations with no values are dropped.
    pub distribution: Vec<(String, BoxStats)>,
    pub by_tree_type: Vec<GroupStats>,
}

/// "Tree structure" tab.  All but `rotations` use Insertion rows only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureViews {
    pub height: Vec<GroupStats>,
    /// Share of the summed mean node counts, in percent.
    pub node_share: Vec<(String, f64)>,
    pub rotations: Vec<GroupStats>,
    pub nodes_vs_height: Vec<(String, Vec<[f64; 2]>)>,
}

/// "Comparison" tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonView {
    pub metric: Option<Metric>,
    pub means: CrossTab,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedViews {
    pub timing: TimingViews,
    pub structure: StructureViews,
    pub comparison: ComparisonView,
}

impl DerivedViews {
    pub fn compute(filtered: &BenchTable, metric: Metric, order: GroupOrder) -> Self {
        DerivedViews {
            timing: TimingViews::compute(filtered, order),
            structure: StructureViews::compute(filtered, order),
            comparison: ComparisonView::compute(filtered, metric, order),
        }
    }
}

impl TimingViews {
    pub fn compute(table: &BenchTable, order: GroupOrder) -> Self {
        let distribution = values_by_operation(table, Metric::AvgTimeNs, order)
            .into_iter()
            .filter_map(|(op, values)| BoxStats::from_values(&values).map(|b| (op, b)))
            .collect();
        TimingViews {
            avg_time: pivot_mean(table, Metric::AvgTimeNs, order),
            total_time: pivot_sum(table, Metric::TotalTimeNs, order),
            distribution,
            by_tree_type: stats_by_tree_type(table, Metric::AvgTimeNs, order),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.avg_time.is_empty() && self.total_time.is_empty() && self.distribution.is_empty()
    }
}

impl StructureViews {
    pub fn compute(table: &BenchTable, order: GroupOrder) -> Self {
        let insertions = filter(table, &Selector::All, &Selector::Only(INSERTION.to_string()));

        let node_means: Vec<(String, f64)> = stats_by_tree_type(&insertions, Metric::FinalNodes, order)
            .into_iter()
            .filter_map(|s| s.mean.map(|m| (s.key, m)))
            .collect();
        let total: f64 = node_means.iter().map(|(_, m)| m).sum();
        let node_share = if total > 0.0 {
            node_means
                .into_iter()
                .map(|(k, m)| (k, m / total * 100.0))
                .collect()
        } else {
            Vec::new()
        };

        StructureViews {
            height: stats_by_tree_type(&insertions, Metric::FinalHeight, order),
            node_share,
            rotations: stats_by_tree_type(table, Metric::Rotations, order)
                .into_iter()
                .filter(|s| s.count > 0)
                .collect(),
            nodes_vs_height: points_by_tree_type(&insertions, Metric::FinalNodes, Metric::FinalHeight, order),
        }
    }
}

impl ComparisonView {
    pub fn compute(table: &BenchTable, metric: Metric, order: GroupOrder) -> Self {
        ComparisonView {
            metric: Some(metric),
            means: pivot_mean(table, metric, order),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset summary (statistics window)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TreeTypeSummary {
    pub tree_type: String,
    pub mean_avg_time: Option<f64>,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub tree_types: Vec<String>,
    pub operations: Vec<String>,
    pub avg_time_mean: Option<f64>,
    pub avg_time_min: Option<f64>,
    pub avg_time_max: Option<f64>,
    pub avg_time_std: Option<f64>,
    pub per_tree_type: Vec<TreeTypeSummary>,
    pub correlation: CorrelationMatrix,
}

impl DatasetSummary {
    pub fn compute(table: &BenchTable) -> Self {
        let values: Vec<f64> = table
            .records
            .iter()
            .filter_map(|r| Metric::AvgTimeNs.value(r))
            .collect();
        let mut acc = Accumulator::default();
        values.iter().for_each(|&v| acc.push(v));

        let per_tree_type = table
            .tree_types()
            .into_iter()
            .map(|tree| {
                let mut acc = Accumulator::default();
                let mut rows = 0;
                for rec in table.records.iter().filter(|r| r.tree_type.as_deref() == Some(tree.as_str())) {
                    rows += 1;
                    acc.push_opt(rec.avg_time_ns);
                }
                TreeTypeSummary {
                    tree_type: tree,
                    mean_avg_time: acc.mean(),
                    rows,
                }
            })
            .collect();

        DatasetSummary {
            rows: table.len(),
            tree_types: table.tree_types(),
            operations: table.operations(),
            avg_time_mean: acc.mean(),
            avg_time_min: values.iter().copied().reduce(f64::min),
            avg_time_max: values.iter().copied().reduce(f64::max),
            avg_time_std: acc.std(),
            per_tree_type,
            correlation: correlation_matrix(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn rec(tree: &str, op: &str, avg: f64, nodes: f64, height: f64, rotations: Option<f64>) -> Record {
        Record {
            tree_type: Some(tree.to_string()),
            operation: Some(op.to_string()),
            data_size: Some(nodes),
            total_time_ns: Some(avg * nodes),
            avg_time_ns: Some(avg),
            final_height: Some(height),
            final_nodes: Some(nodes),
            rotations,
        }
    }

    fn table() -> BenchTable {
        BenchTable::new(vec![
            rec("AVL Tree", "Insertion", 100.0, 300.0, 9.0, Some(120.0)),
            rec("Treap", "Insertion", 80.0, 100.0, 12.0, Some(60.0)),
            rec("AVL Tree", "Search", 40.0, 300.0, 9.0, Some(0.0)),
            rec("2-3 Tree", "Search", 30.0, 100.0, 6.0, None),
        ])
    }

    #[test]
    fn structure_views_use_insertion_rows() {
        let s = StructureViews::compute(&table(), GroupOrder::FirstAppearance);
        assert_eq!(s.height.len(), 2);
        assert_eq!(s.height[0].key, "AVL Tree");
        assert_eq!(s.node_share, vec![("AVL Tree".to_string(), 75.0), ("Treap".to_string(), 25.0)]);
        // rotations cover every filtered row, 2-3 Tree has none
        assert_eq!(s.rotations.len(), 2);
        assert_eq!(s.rotations[0].sum, Some(120.0));
        assert_eq!(s.nodes_vs_height[1], ("Treap".to_string(), vec![[100.0, 12.0]]));
    }

    #[test]
    fn empty_views_report_no_data() {
        let views = DerivedViews::compute(&BenchTable::default(), Metric::Rotations, GroupOrder::FirstAppearance);
        assert!(views.timing.is_empty());
        assert!(views.structure.height.is_empty());
        assert!(views.structure.node_share.is_empty());
        assert!(views.comparison.means.is_empty());
        assert_eq!(views.comparison.metric, Some(Metric::Rotations));
    }

    #[test]
    fn timing_views_group_by_operation() {
        let t = TimingViews::compute(&table(), GroupOrder::FirstAppearance);
        assert_eq!(t.distribution.len(), 2);
        assert_eq!(t.distribution[0].0, "Insertion");
        assert_eq!(t.distribution[0].1.median, 90.0);
        assert_eq!(t.avg_time.get("AVL Tree", "Search"), Some(40.0));
        assert_eq!(t.total_time.get("Treap", "Insertion"), Some(8000.0));
    }

    #[test]
    fn alphabetical_order_reorders_every_axis() {
        let views = DerivedViews::compute(&table(), Metric::AvgTimeNs, GroupOrder::Alphabetical);
        assert_eq!(views.timing.avg_time.rows, vec!["2-3 Tree", "AVL Tree", "Treap"]);
        assert_eq!(views.timing.by_tree_type[0].key, "2-3 Tree");
        assert_eq!(views.structure.height[0].key, "AVL Tree");
        assert_eq!(views.comparison.means.columns, vec!["Insertion", "Search"]);
    }

    #[test]
    fn summary_counts_rows_per_tree_type() {
        let s = DatasetSummary::compute(&table());
        assert_eq!(s.rows, 4);
        assert_eq!(s.tree_types, vec!["AVL Tree", "Treap", "2-3 Tree"]);
        assert_eq!(s.operations, vec!["Insertion", "Search"]);
        assert_eq!(s.avg_time_min, Some(30.0));
        assert_eq!(s.avg_time_max, Some(100.0));
        assert_eq!(s.avg_time_mean, Some(62.5));
        assert_eq!(s.per_tree_type[0].rows, 2);
        assert_eq!(s.per_tree_type[0].mean_avg_time, Some(70.0));
    }
}
