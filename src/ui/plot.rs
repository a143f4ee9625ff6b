use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, Points};

use crate::data::aggregate::{CrossTab, GroupStats};
use crate::data::model::Metric;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const NO_DATA: &str = "No data to display";

fn no_data(ui: &mut Ui, height: f32) {
    ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(NO_DATA);
        });
    });
}

/// Height of one cell in a 2 × 2 chart grid.
fn cell_height(ui: &Ui) -> f32 {
    (ui.available_height() / 2.0 - 36.0).max(160.0)
}

/// A plot whose x axis shows `labels` at integer positions.
fn category_plot(id: &str, labels: Vec<String>, height: f32) -> Plot<'static> {
    Plot::new(id.to_string())
        .height(height)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_formatter(move |mark: GridMark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
}

/// One bar series per cross-tab column, grouped by row.
fn grouped_bars(tab: &CrossTab, state: &AppState) -> Vec<BarChart> {
    let n_series = tab.columns.len().max(1) as f64;
    let bar_w = 0.8 / n_series;
    tab.columns
        .iter()
        .enumerate()
        .map(|(j, op)| {
            let bars: Vec<Bar> = tab
                .column_values(j)
                .into_iter()
                .enumerate()
                .filter_map(|(i, v)| {
                    let v = v?;
                    let x = i as f64 - 0.4 + bar_w * (j as f64 + 0.5);
                    Some(Bar::new(x, v).width(bar_w).name(&tab.rows[i]))
                })
                .collect();
            BarChart::new(bars)
                .name(op)
                .color(state.operation_colors.color_for(op))
        })
        .collect()
}

fn mean_bars_with_error(stats: &[GroupStats], state: &AppState, id: &str, height: f32, ui: &mut Ui) {
    let labels: Vec<String> = stats.iter().map(|s| s.key.clone()).collect();
    category_plot(id, labels, height).show(ui, |plot_ui| {
        for (i, s) in stats.iter().enumerate() {
            let Some(mean) = s.mean else {
                continue;
            };
            let x = i as f64;
            let color = state.tree_colors.color_for(&s.key);
            plot_ui.bar_chart(
                BarChart::new(vec![Bar::new(x, mean).width(0.6)])
                    .name(&s.key)
                    .color(color),
            );
            if let Some(std) = s.std {
                plot_ui.line(
                    Line::new(vec![[x, mean - std], [x, mean + std]])
                        .color(Color32::DARK_GRAY)
                        .width(2.0),
                );
            }
        }
    });
}

// ---------------------------------------------------------------------------
// "Operation time" tab
// ---------------------------------------------------------------------------

pub fn timing_tab(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        welcome(ui);
        return;
    }
    let views = &state.views.timing;
    let h = cell_height(ui);

    ui.columns(2, |cols| {
        cols[0].strong("Average time (ns)");
        if views.avg_time.is_empty() {
            no_data(&mut cols[0], h);
        } else {
            category_plot("avg_time", views.avg_time.rows.clone(), h).show(&mut cols[0], |plot_ui| {
                for chart in grouped_bars(&views.avg_time, state) {
                    plot_ui.bar_chart(chart);
                }
            });
        }

        cols[1].strong("Total time (ns)");
        if views.total_time.is_empty() {
            no_data(&mut cols[1], h);
        } else {
            category_plot("total_time", views.total_time.rows.clone(), h).show(&mut cols[1], |plot_ui| {
                for chart in grouped_bars(&views.total_time, state) {
                    plot_ui.bar_chart(chart);
                }
            });
        }

        cols[0].strong("Time distribution by operation");
        if views.distribution.is_empty() {
            no_data(&mut cols[0], h);
        } else {
            let labels = views.distribution.iter().map(|(op, _)| op.clone()).collect();
            category_plot("time_distribution", labels, h).show(&mut cols[0], |plot_ui| {
                for (i, (op, b)) in views.distribution.iter().enumerate() {
                    let elem = BoxElem::new(i as f64, BoxSpread::new(b.min, b.q1, b.median, b.q3, b.max))
                        .box_width(0.5)
                        .name(op);
                    plot_ui.box_plot(
                        BoxPlot::new(vec![elem])
                            .name(op)
                            .color(state.operation_colors.color_for(op)),
                    );
                }
            });
        }

        cols[1].strong("Mean time by tree type (± std)");
        if views.by_tree_type.iter().all(|s| s.mean.is_none()) {
            no_data(&mut cols[1], h);
        } else {
            mean_bars_with_error(&views.by_tree_type, state, "time_by_tree", h, &mut cols[1]);
        }
    });
}

// ---------------------------------------------------------------------------
// "Tree structure" tab
// ---------------------------------------------------------------------------

pub fn structure_tab(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        welcome(ui);
        return;
    }
    let views = &state.views.structure;
    let h = cell_height(ui);

    ui.columns(2, |cols| {
        cols[0].strong("Mean height after insertion (± std)");
        if views.height.iter().all(|s| s.mean.is_none()) {
            no_data(&mut cols[0], h);
        } else {
            mean_bars_with_error(&views.height, state, "height", h, &mut cols[0]);
        }

        cols[1].strong("Node share by tree type (%)");
        if views.node_share.is_empty() {
            no_data(&mut cols[1], h);
        } else {
            let labels = views.node_share.iter().map(|(k, _)| k.clone()).collect();
            category_plot("node_share", labels, h).show(&mut cols[1], |plot_ui| {
                for (i, (tree, pct)) in views.node_share.iter().enumerate() {
                    plot_ui.bar_chart(
                        BarChart::new(vec![Bar::new(i as f64, *pct).width(0.6)])
                            .name(format!("{tree} ({pct:.1}%)"))
                            .color(state.tree_colors.color_for(tree)),
                    );
                }
            });
        }

        cols[0].strong("Total rotations");
        if views.rotations.is_empty() {
            no_data(&mut cols[0], h);
        } else {
            let labels = views.rotations.iter().map(|s| s.key.clone()).collect();
            category_plot("rotations", labels, h).show(&mut cols[0], |plot_ui| {
                for (i, s) in views.rotations.iter().enumerate() {
                    let total = s.sum.unwrap_or_default();
                    plot_ui.bar_chart(
                        BarChart::new(vec![Bar::new(i as f64, total).width(0.6)])
                            .name(&s.key)
                            .color(state.tree_colors.color_for(&s.key)),
                    );
                }
            });
        }

        cols[1].strong("Height vs node count");
        if views.nodes_vs_height.iter().all(|(_, pts)| pts.is_empty()) {
            no_data(&mut cols[1], h);
        } else {
            Plot::new("nodes_vs_height")
                .height(h)
                .legend(Legend::default())
                .x_axis_label("Nodes")
                .y_axis_label("Height")
                .show(&mut cols[1], |plot_ui| {
                    for (tree, pts) in &views.nodes_vs_height {
                        if pts.is_empty() {
                            continue;
                        }
                        plot_ui.points(
                            Points::new(pts.clone())
                                .radius(4.0)
                                .name(tree)
                                .color(state.tree_colors.color_for(tree)),
                        );
                    }
                });
        }
    });
}

// ---------------------------------------------------------------------------
// "Comparison" tab
// ---------------------------------------------------------------------------

pub fn comparison_tab(ui: &mut Ui, state: &mut AppState) {
    if state.table.is_none() {
        welcome(ui);
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Metric:");
        let mut picked = None;
        egui::ComboBox::from_id_salt("comparison_metric")
            .selected_text(state.metric.column_name())
            .show_ui(ui, |ui: &mut Ui| {
                for m in Metric::SELECTABLE {
                    if ui.selectable_label(state.metric == m, m.column_name()).clicked() {
                        picked = Some(m);
                    }
                }
            });
        if let Some(m) = picked.filter(|m| *m != state.metric) {
            state.set_metric(m);
        }
    });

    let view = &state.views.comparison;
    let metric = view.metric.unwrap_or(state.metric);
    ui.strong(format!("{metric} by tree type and operation"));
    let h = ui.available_height().max(200.0);
    if view.means.is_empty() {
        no_data(ui, h);
        return;
    }
    category_plot("comparison", view.means.rows.clone(), h)
        .y_axis_label(metric.column_name())
        .show(ui, |plot_ui| {
            for chart in grouped_bars(&view.means, state) {
                plot_ui.bar_chart(chart);
            }
        });
}

fn welcome(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("Open a benchmark CSV to begin  (File → Open CSV…)");
    });
}
