use std::collections::HashMap;
use std::hash::Hash;

use super::model::{BenchTable, Metric, Record};

// ---------------------------------------------------------------------------
// Grouping keys and axis order
// ---------------------------------------------------------------------------

/// The two categorical columns tables are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    TreeType,
    Operation,
}

impl Category {
    pub fn key(self, record: &Record) -> Option<&str> {
        match self {
            Category::TreeType => record.tree_type.as_deref(),
            Category::Operation => record.operation.as_deref(),
        }
    }
}

/// Order of categorical axes in every aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    #[default]
    FirstAppearance,
    Alphabetical,
}

impl GroupOrder {
    pub fn apply<T>(self, items: &mut [T], key: impl Fn(&T) -> &str) {
        if self == GroupOrder::Alphabetical {
            items.sort_by(|a, b| key(a).cmp(key(b)));
        }
    }
}

// ---------------------------------------------------------------------------
// Accumulator – single-pass count / sum / sum of squares
// ---------------------------------------------------------------------------

/// Squares are accumulated relative to the first value pushed, so large,
/// closely spaced values (nanosecond totals) keep their spread.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    count: usize,
    shift: f64,
    sum: f64,
    shifted_sum: f64,
    shifted_sum_sq: f64,
}

impl Accumulator {
    pub fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.shift = value;
        }
        let d = value - self.shift;
        self.count += 1;
        self.sum += value;
        self.shifted_sum += d;
        self.shifted_sum_sq += d * d;
    }

    pub fn push_opt(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.push(v);
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn sum(&self) -> Option<f64> {
        (self.count > 0).then_some(self.sum)
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.shift + self.shifted_sum / self.count as f64)
    }

    /// Sample standard deviation (n − 1).  Undefined below two values.
    pub fn std(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        let n = self.count as f64;
        let variance = (self.shifted_sum_sq - self.shifted_sum * self.shifted_sum / n) / (n - 1.0);
        Some(variance.max(0.0).sqrt())
    }
}

/// Group records by a key in first-appearance order, accumulating `metric`.
/// Records whose key is missing are skipped; a group whose values are all
/// missing is kept with an empty accumulator.
fn group_by<K, F>(table: &BenchTable, key: F, metric: Metric) -> Vec<(K, Accumulator)>
where
    K: Clone + Eq + Hash,
    F: Fn(&Record) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Accumulator)> = Vec::new();
    for rec in &table.records {
        let Some(k) = key(rec) else {
            continue;
        };
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, Accumulator::default()));
            groups.len() - 1
        });
        groups[slot].1.push_opt(metric.value(rec));
    }
    groups
}

// ---------------------------------------------------------------------------
// Cross tabs: TreeType × Operation
// ---------------------------------------------------------------------------

/// A pivoted table: rows are tree types, columns are operations.
/// `None` cells have no non-missing values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl CrossTab {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|x| x == row)?;
        let c = self.columns.iter().position(|x| x == column)?;
        self.cells[r][c]
    }

    /// Values of one column in row order, used as one bar series.
    pub fn column_values(&self, column: usize) -> Vec<Option<f64>> {
        self.cells.iter().map(|row| row[column]).collect()
    }

    /// True when no cell holds a value.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.cells.iter().flatten().flatten().copied().reduce(f64::max)
    }
}

fn pivot(
    table: &BenchTable,
    metric: Metric,
    order: GroupOrder,
    reduce: impl Fn(&Accumulator) -> Option<f64>,
) -> CrossTab {
    let groups = group_by(
        table,
        |rec| Some((rec.tree_type.clone()?, rec.operation.clone()?)),
        metric,
    );

    let mut rows: Vec<String> = Vec::new();
    let mut columns: Vec<String> = Vec::new();
    for ((tree, op), _) in &groups {
        if !rows.contains(tree) {
            rows.push(tree.clone());
        }
        if !columns.contains(op) {
            columns.push(op.clone());
        }
    }
    order.apply(&mut rows, |s| s.as_str());
    order.apply(&mut columns, |s| s.as_str());

    let lookup: HashMap<(&str, &str), &Accumulator> = groups
        .iter()
        .map(|((t, o), acc)| ((t.as_str(), o.as_str()), acc))
        .collect();

    let cells = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| lookup.get(&(r.as_str(), c.as_str())).and_then(|acc| reduce(*acc)))
                .collect()
        })
        .collect();

    CrossTab { rows, columns, cells }
}

/// Mean of `metric` per (TreeType, Operation).
pub fn pivot_mean(table: &BenchTable, metric: Metric, order: GroupOrder) -> CrossTab {
    pivot(table, metric, order, Accumulator::mean)
}

/// Sum of `metric` per (TreeType, Operation).
pub fn pivot_sum(table: &BenchTable, metric: Metric, order: GroupOrder) -> CrossTab {
    pivot(table, metric, order, Accumulator::sum)
}

// ---------------------------------------------------------------------------
// One-key summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub key: String,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    /// Number of non-missing values.
    pub count: usize,
    pub sum: Option<f64>,
}

pub fn stats_by(table: &BenchTable, category: Category, metric: Metric, order: GroupOrder) -> Vec<GroupStats> {
    let mut stats: Vec<GroupStats> = group_by(table, |rec| category.key(rec).map(str::to_string), metric)
        .into_iter()
        .map(|(key, acc)| GroupStats {
            key,
            mean: acc.mean(),
            std: acc.std(),
            count: acc.count(),
            sum: acc.sum(),
        })
        .collect();
    order.apply(&mut stats, |s| s.key.as_str());
    stats
}

/// Mean, sample standard deviation and count of `metric` per tree type.
pub fn stats_by_tree_type(table: &BenchTable, metric: Metric, order: GroupOrder) -> Vec<GroupStats> {
    stats_by(table, Category::TreeType, metric, order)
}

/// Raw non-missing values of `metric` per category value.
pub fn values_by(table: &BenchTable, category: Category, metric: Metric, order: GroupOrder) -> Vec<(String, Vec<f64>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(String, Vec<f64>)> = Vec::new();
    for rec in &table.records {
        let Some(key) = category.key(rec) else {
            continue;
        };
        let slot = *index.entry(key).or_insert_with(|| {
            out.push((key.to_string(), Vec::new()));
            out.len() - 1
        });
        if let Some(v) = metric.value(rec) {
            out[slot].1.push(v);
        }
    }
    order.apply(&mut out, |(k, _)| k.as_str());
    out
}

pub fn values_by_operation(table: &BenchTable, metric: Metric, order: GroupOrder) -> Vec<(String, Vec<f64>)> {
    values_by(table, Category::Operation, metric, order)
}

pub fn values_by_tree_type(table: &BenchTable, metric: Metric, order: GroupOrder) -> Vec<(String, Vec<f64>)> {
    values_by(table, Category::TreeType, metric, order)
}

/// `(x, y)` pairs per tree type, keeping only records where both are present.
pub fn points_by_tree_type(
    table: &BenchTable,
    x: Metric,
    y: Metric,
    order: GroupOrder,
) -> Vec<(String, Vec<[f64; 2]>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(String, Vec<[f64; 2]>)> = Vec::new();
    for rec in &table.records {
        let Some(key) = rec.tree_type.as_deref() else {
            continue;
        };
        let slot = *index.entry(key).or_insert_with(|| {
            out.push((key.to_string(), Vec::new()));
            out.len() - 1
        });
        if let (Some(xv), Some(yv)) = (x.value(rec), y.value(rec)) {
            out[slot].1.push([xv, yv]);
        }
    }
    order.apply(&mut out, |(k, _)| k.as_str());
    out
}

// ---------------------------------------------------------------------------
// Distribution summaries
// ---------------------------------------------------------------------------

/// Five-number summary for a box plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// Quartiles by linear interpolation between closest ranks.
    pub fn from_values(values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let quantile = |q: f64| {
            let pos = q * (sorted.len() - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        };
        Some(BoxStats {
            min: sorted[0],
            q1: quantile(0.25),
            median: quantile(0.5),
            q3: quantile(0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Overlaid histograms sharing one set of bin edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    pub series: Vec<(String, Vec<usize>)>,
}

impl Histogram {
    pub fn from_series(series: &[(String, Vec<f64>)], bins: usize) -> Option<Histogram> {
        let bins = bins.max(1);
        let all = series.iter().flat_map(|(_, v)| v.iter().copied());
        let (min, max) = all.fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
        let (min, max) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
        let width = (max - min) / bins as f64;

        let edges = (0..=bins).map(|i| min + width * i as f64).collect();
        let series = series
            .iter()
            .map(|(name, values)| {
                let mut counts = vec![0usize; bins];
                for &v in values {
                    let idx = (((v - min) / width).floor() as usize).min(bins - 1);
                    counts[idx] += 1;
                }
                (name.clone(), counts)
            })
            .collect();

        Some(Histogram { edges, series })
    }

    pub fn max_count(&self) -> usize {
        self.series
            .iter()
            .flat_map(|(_, c)| c.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation over all numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub metrics: Vec<Metric>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: Metric, b: Metric) -> Option<f64> {
        let i = self.metrics.iter().position(|m| *m == a)?;
        let j = self.metrics.iter().position(|m| *m == b)?;
        self.values[i][j]
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().flatten().all(Option::is_none)
    }
}

pub fn correlation_matrix(table: &BenchTable) -> CorrelationMatrix {
    let metrics = Metric::ALL.to_vec();
    let values = metrics
        .iter()
        .map(|&a| metrics.iter().map(|&b| pearson(table, a, b)).collect())
        .collect();
    CorrelationMatrix { metrics, values }
}

/// Correlation over records where both columns are present.
fn pearson(table: &BenchTable, a: Metric, b: Metric) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = table
        .records
        .iter()
        .filter_map(|r| Some((a.value(r)?, b.value(r)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let constant = |pick: fn(&(f64, f64)) -> f64| pairs.iter().all(|p| pick(p) == pick(&pairs[0]));
    if constant(|p| p.0) || constant(|p| p.1) {
        return None;
    }
    if a == b {
        return Some(1.0);
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}
