use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{format_value, Metric, REQUIRED_COLUMNS};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Filtered records as a scrollable table, headed by record and category counts.
pub fn data_tab(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.label("No data to display");
        return;
    }

    let rows = &state.filtered.records;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "Records shown: {} | Tree types: {} | Operations: {}",
            rows.len(),
            state.filtered.tree_types().len(),
            state.filtered.operations().len()
        ));
    });
    ui.separator();

    let table_height = ui.available_height();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(table_height)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(80.0), REQUIRED_COLUMNS.len())
        .header(20.0, |mut header| {
            for name in REQUIRED_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let rec = &rows[row.index()];
                row.col(|ui| {
                    ui.label(rec.tree_type.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(rec.operation.as_deref().unwrap_or(""));
                });
                for metric in Metric::ALL {
                    row.col(|ui| {
                        ui.label(format_value(metric.value(rec)));
                    });
                }
            });
        });
}
