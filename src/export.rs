//! Chart export to PNG (plotters bitmap backend) and CSV export of the table view.

use std::path::{Path, PathBuf};

use anyhow::Result;
use eframe::egui::Color32;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::color::{diverging, generate_palette};
use crate::data::aggregate::{
    correlation_matrix, pivot_mean, pivot_sum, values_by_tree_type, CorrelationMatrix, CrossTab,
    GroupOrder, Histogram,
};
use crate::data::filter::{filter, Selector};
use crate::data::model::{BenchTable, Metric, INSERTION, REQUIRED_COLUMNS};
use crate::error::{ExportError, MissingData};

/// Pixel size of bar charts and histograms (10 × 6 in at 300 dpi).
pub const CHART_SIZE: (u32, u32) = (3000, 1800);
/// Pixel size of the correlation heatmap (8 × 6 in at 300 dpi).
pub const HEATMAP_SIZE: (u32, u32) = (2400, 1800);
pub const HISTOGRAM_BINS: usize = 15;

const CAPTION_FONT: f64 = 64.0;
const LABEL_FONT: f64 = 36.0;

// ---------------------------------------------------------------------------
// Chart catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportChart {
    AvgTime,
    TotalTime,
    Correlation,
    HeightDistribution,
}

impl ExportChart {
    pub const ALL: [ExportChart; 4] = [
        ExportChart::AvgTime,
        ExportChart::TotalTime,
        ExportChart::Correlation,
        ExportChart::HeightDistribution,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ExportChart::AvgTime => "avg_time_comparison.png",
            ExportChart::TotalTime => "total_time_comparison.png",
            ExportChart::Correlation => "correlation_heatmap.png",
            ExportChart::HeightDistribution => "height_distribution.png",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ExportChart::AvgTime => "Average operation time",
            ExportChart::TotalTime => "Total operation time",
            ExportChart::Correlation => "Correlation of numeric metrics",
            ExportChart::HeightDistribution => "Tree height after insertion",
        }
    }
}

/// Outcome of one export batch.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<MissingData>,
}

// ---------------------------------------------------------------------------
// Batch export
// ---------------------------------------------------------------------------

/// Render every chart of the full cleaned table into `dir`.
///
/// Charts with no data are skipped and listed in the report.  On a render
/// failure, files already written in this batch stay in place.
pub fn export_charts(table: &BenchTable, dir: &Path) -> Result<ExportReport, ExportError> {
    if !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()));
    }

    let mut report = ExportReport::default();
    for chart in ExportChart::ALL {
        let path = dir.join(chart.file_name());
        let drawn = render_chart(chart, table, &path).map_err(|e| ExportError::Render {
            chart: chart.file_name(),
            message: format!("{e:#}"),
        })?;
        if drawn {
            log::info!("Exported {}", path.display());
            report.written.push(path);
        } else {
            log::warn!("Skipped {}: no data", chart.file_name());
            report.skipped.push(MissingData::new(chart.title()));
        }
    }
    Ok(report)
}

/// Returns `Ok(false)` when the chart has nothing to draw.
fn render_chart(chart: ExportChart, table: &BenchTable, path: &Path) -> Result<bool> {
    let order = GroupOrder::FirstAppearance;
    match chart {
        ExportChart::AvgTime => {
            let tab = pivot_mean(table, Metric::AvgTimeNs, order);
            if tab.is_empty() {
                return Ok(false);
            }
            write_grouped_bars_png(path, &tab, chart.title(), "Mean time (ns)", CHART_SIZE)?;
        }
        ExportChart::TotalTime => {
            let tab = pivot_sum(table, Metric::TotalTimeNs, order);
            if tab.is_empty() {
                return Ok(false);
            }
            write_grouped_bars_png(path, &tab, chart.title(), "Total time (ns)", CHART_SIZE)?;
        }
        ExportChart::Correlation => {
            let matrix = correlation_matrix(table);
            if matrix.is_empty() {
                return Ok(false);
            }
            write_heatmap_png(path, &matrix, chart.title(), HEATMAP_SIZE)?;
        }
        ExportChart::HeightDistribution => {
            let insertions = filter(table, &Selector::All, &Selector::Only(INSERTION.to_string()));
            let series = values_by_tree_type(&insertions, Metric::FinalHeight, order);
            let Some(hist) = Histogram::from_series(&series, HISTOGRAM_BINS) else {
                return Ok(false);
            };
            write_histogram_png(path, &hist, chart.title(), CHART_SIZE)?;
        }
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// PNG writers
// ---------------------------------------------------------------------------

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

fn rgb(c: Color32) -> RGBColor {
    RGBColor(c.r(), c.g(), c.b())
}

/// Label for the category at integer tick `v`; blank between categories.
fn category_label(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Grouped bar chart: one group per tree type, one bar per operation.
pub fn write_grouped_bars_png(
    path: &Path,
    tab: &CrossTab,
    title: &str,
    y_label: &str,
    (width, height): (u32, u32),
) -> Result<()> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let n_groups = tab.rows.len();
    let n_series = tab.columns.len().max(1);
    let y_max = tab.max_value().unwrap_or(1.0).max(f64::EPSILON) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .margin(40)
        .caption(title, font(CAPTION_FONT))
        .x_label_area_size(90)
        .y_label_area_size(160)
        .build_cartesian_2d(-0.5..(n_groups as f64 - 0.5), 0.0..y_max)?;

    let rows = tab.rows.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n_groups)
        .x_label_formatter(&|v| category_label(&rows, *v))
        .y_desc(y_label)
        .x_desc("Tree type")
        .label_style(font(LABEL_FONT))
        .draw()?;

    let palette = generate_palette(tab.columns.len());
    let bar_w = 0.8 / n_series as f64;
    for (j, op) in tab.columns.iter().enumerate() {
        let color = rgb(palette[j]);
        let bars = tab
            .column_values(j)
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .map(move |(i, v)| {
                let x0 = i as f64 - 0.4 + j as f64 * bar_w;
                Rectangle::new([(x0, 0.0), (x0 + bar_w, v)], color.filled())
            });
        chart
            .draw_series(bars)?
            .label(op.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 10), (x + 20, y + 10)], color.filled()));
    }

    chart
        .configure_series_labels()
        .label_font(font(LABEL_FONT))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Annotated correlation heatmap; the first metric is the top row.
pub fn write_heatmap_png(
    path: &Path,
    matrix: &CorrelationMatrix,
    title: &str,
    (width, height): (u32, u32),
) -> Result<()> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let k = matrix.metrics.len();
    let labels: Vec<String> = matrix.metrics.iter().map(|m| m.column_name().to_string()).collect();
    let y_labels: Vec<String> = labels.iter().rev().cloned().collect();

    let mut chart = ChartBuilder::on(&root)
        .margin(40)
        .caption(title, font(CAPTION_FONT))
        .x_label_area_size(90)
        .y_label_area_size(260)
        .build_cartesian_2d(-0.5..(k as f64 - 0.5), -0.5..(k as f64 - 0.5))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(k)
        .y_labels(k)
        .x_label_formatter(&|v| category_label(&labels, *v))
        .y_label_formatter(&|v| category_label(&y_labels, *v))
        .label_style(font(LABEL_FONT - 8.0))
        .draw()?;

    let text_style = font(LABEL_FONT)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    for (i, row) in matrix.values.iter().enumerate() {
        let y = (k - 1 - i) as f64;
        for (j, value) in row.iter().enumerate() {
            let x = j as f64;
            let fill = value.map(|v| rgb(diverging(v))).unwrap_or(RGBColor(200, 200, 200));
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                fill.filled(),
            )))?;
            let text = value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "n/a".to_string());
            chart.draw_series(std::iter::once(Text::new(text, (x, y), text_style.clone())))?;
        }
    }

    root.present()?;
    Ok(())
}

/// Overlaid, semi-transparent histograms sharing bin edges.
pub fn write_histogram_png(path: &Path, hist: &Histogram, title: &str, (width, height): (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_min = hist.edges[0];
    let x_max = hist.edges[hist.edges.len() - 1];
    let y_max = hist.max_count().max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .margin(40)
        .caption(title, font(CAPTION_FONT))
        .x_label_area_size(90)
        .y_label_area_size(120)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Height")
        .y_desc("Frequency")
        .label_style(font(LABEL_FONT))
        .draw()?;

    let palette = generate_palette(hist.series.len());
    for (idx, (name, counts)) in hist.series.iter().enumerate() {
        let color = rgb(palette[idx]);
        let edges = &hist.edges;
        let bars = counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(move |(b, &c)| {
                Rectangle::new([(edges[b], 0.0), (edges[b + 1], c as f64)], color.mix(0.5).filled())
            });
        chart
            .draw_series(bars)?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 10), (x + 20, y + 10)], color.mix(0.5).filled()));
    }

    chart
        .configure_series_labels()
        .label_font(font(LABEL_FONT))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Table export
// ---------------------------------------------------------------------------

/// Write records as `;`-delimited CSV with the benchmark header.
/// The header is written even when there are no rows.
pub fn write_table_csv(table: &BenchTable, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(REQUIRED_COLUMNS)?;
    for record in &table.records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bench_table;
    use crate::data::model::Record;

    #[test]
    fn export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("nope");
        let err = export_charts(&BenchTable::default(), &target).unwrap_err();
        assert!(matches!(err, ExportError::NotADirectory(p) if p == target));
    }

    #[test]
    fn export_of_empty_table_skips_every_chart() {
        let dir = tempfile::tempdir().expect("temp dir");
        let report = export_charts(&BenchTable::default(), dir.path()).expect("export");
        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), ExportChart::ALL.len());
        assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 0);
    }

    fn rec(tree: &str, op: &str, size: f64, avg: f64, height: f64) -> Record {
        Record {
            tree_type: Some(tree.into()),
            operation: Some(op.into()),
            data_size: Some(size),
            total_time_ns: Some(avg * size),
            avg_time_ns: Some(avg),
            final_height: Some(height),
            final_nodes: Some(size),
            rotations: Some(size * 0.7),
        }
    }

    fn is_png(path: &Path) -> bool {
        let bytes = std::fs::read(path).expect("read png");
        bytes.starts_with(b"\x89PNG\r\n\x1a\n")
    }

    #[test]
    fn export_writes_every_chart() {
        let table = BenchTable::new(vec![
            rec("AVL Tree", "Insertion", 1000.0, 90.0, 11.0),
            rec("AVL Tree", "Search", 1000.0, 40.0, 11.0),
            rec("Treap", "Insertion", 5000.0, 130.0, 27.0),
            rec("Treap", "Search", 5000.0, 70.0, 27.0),
            rec("2-3 Tree", "Insertion", 10000.0, 100.0, 9.0),
        ]);
        let dir = tempfile::tempdir().expect("temp dir");
        let report = export_charts(&table, dir.path()).expect("export");

        assert!(report.skipped.is_empty(), "skipped: {:?}", report.skipped);
        assert_eq!(report.written.len(), 4);
        for chart in ExportChart::ALL {
            let path = dir.path().join(chart.file_name());
            assert!(report.written.contains(&path), "{} not reported", chart.file_name());
            assert!(is_png(&path), "{} is not a PNG", chart.file_name());
        }
    }

    #[test]
    fn export_without_insertions_skips_only_height_histogram() {
        let table = BenchTable::new(vec![
            rec("AVL Tree", "Search", 1000.0, 40.0, 11.0),
            rec("Treap", "Search", 5000.0, 70.0, 27.0),
            rec("AA Tree", "Deletion", 10000.0, 95.0, 15.0),
        ]);
        let dir = tempfile::tempdir().expect("temp dir");
        let report = export_charts(&table, dir.path()).expect("export");

        assert_eq!(
            report.skipped,
            vec![MissingData::new(ExportChart::HeightDistribution.title())]
        );
        assert_eq!(report.written.len(), 3);
        assert!(!dir.path().join("height_distribution.png").exists());
        for name in [
            "avg_time_comparison.png",
            "total_time_comparison.png",
            "correlation_heatmap.png",
        ] {
            assert!(is_png(&dir.path().join(name)), "{name} is not a PNG");
        }
    }

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let labels = vec!["AVL Tree".to_string(), "Treap".to_string()];
        assert_eq!(category_label(&labels, 0.0), "AVL Tree");
        assert_eq!(category_label(&labels, 1.0), "Treap");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn table_csv_loads_back() {
        let table = BenchTable::new(vec![
            Record {
                tree_type: Some("AA Tree".into()),
                operation: Some("Deletion".into()),
                data_size: Some(500.0),
                total_time_ns: Some(1250.5),
                avg_time_ns: Some(2.501),
                final_height: Some(9.0),
                final_nodes: Some(0.0),
                rotations: None,
            },
            Record {
                tree_type: Some("Treap".into()),
                operation: Some("Search".into()),
                data_size: Some(500.0),
                ..Record::default()
            },
        ]);
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("filtered.csv");
        write_table_csv(&table, &path).expect("write");
        assert_eq!(load_bench_table(&path).expect("load"), table);
    }

    #[test]
    fn empty_table_csv_keeps_header_and_loads_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("empty.csv");
        write_table_csv(&BenchTable::default(), &path).expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text.trim_end(), REQUIRED_COLUMNS.join(";"));
        assert!(load_bench_table(&path).expect("load").is_empty());
    }
}
