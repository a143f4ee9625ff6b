use eframe::egui::{self, Grid, RichText, Ui};

use crate::color::diverging;
use crate::data::views::DatasetSummary;
use crate::state::AppState;

/// Floating window with whole-dataset statistics.
pub fn stats_window(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_stats {
        return;
    }
    let mut open = state.show_stats;
    egui::Window::new("Dataset statistics")
        .open(&mut open)
        .default_size([600.0, 400.0])
        .vscroll(true)
        .show(ctx, |ui: &mut Ui| match &state.summary {
            Some(summary) => summary_body(ui, summary),
            None => {
                ui.label("No data to analyse.");
            }
        });
    state.show_stats = open;
}

fn summary_body(ui: &mut Ui, s: &DatasetSummary) {
    ui.heading("Overview");
    ui.label(format!("Total records: {}", s.rows));
    ui.label(format!("Tree types: {}", s.tree_types.join(", ")));
    ui.label(format!("Operations: {}", s.operations.join(", ")));
    ui.separator();

    ui.heading("AvgTimeNs (ns)");
    Grid::new("avg_time_stats").num_columns(2).show(ui, |ui: &mut Ui| {
        for (label, value) in [
            ("Mean", s.avg_time_mean),
            ("Min", s.avg_time_min),
            ("Max", s.avg_time_max),
            ("Std deviation", s.avg_time_std),
        ] {
            ui.label(label);
            ui.label(value.map_or_else(|| "no data".to_string(), |v| format!("{v:.0}")));
            ui.end_row();
        }
    });
    ui.separator();

    ui.heading("By tree type");
    Grid::new("per_tree_type").num_columns(3).striped(true).show(ui, |ui: &mut Ui| {
        ui.strong("Tree type");
        ui.strong("Mean AvgTimeNs");
        ui.strong("Records");
        ui.end_row();
        for t in &s.per_tree_type {
            ui.label(&t.tree_type);
            ui.label(t.mean_avg_time.map_or_else(|| "no data".to_string(), |v| format!("{v:.0} ns")));
            ui.label(t.rows.to_string());
            ui.end_row();
        }
    });
    ui.separator();

    ui.heading("Correlation");
    let m = &s.correlation;
    Grid::new("correlation").num_columns(m.metrics.len() + 1).show(ui, |ui: &mut Ui| {
        ui.label("");
        for metric in &m.metrics {
            ui.strong(metric.column_name());
        }
        ui.end_row();
        for (metric, row) in m.metrics.iter().zip(&m.values) {
            ui.strong(metric.column_name());
            for value in row {
                match value {
                    Some(v) => {
                        ui.label(RichText::new(format!("{v:.2}")).background_color(diverging(*v)));
                    }
                    None => {
                        ui.label("n/a");
                    }
                }
            }
            ui.end_row();
        }
    });
}
