use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::aggregate::GroupOrder;
use crate::data::filter::Selector;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.strong("Tree type");
    let options = state.tree_type_options();
    if let Some(sel) = selector_combo(ui, "tree_type", &state.pending.tree_type, &options) {
        state.set_tree_type(sel);
    }
    ui.add_space(4.0);

    ui.strong("Operation");
    let options = state.operation_options();
    if let Some(sel) = selector_combo(ui, "operation", &state.pending.operation, &options) {
        state.set_operation(sel);
    }
    ui.add_space(8.0);

    let dirty = state.pending != state.applied;
    let label = if dirty { "Apply filters *" } else { "Apply filters" };
    if ui.button(label).clicked() {
        state.apply_filters();
    }

    let mut alphabetical = state.order == GroupOrder::Alphabetical;
    if ui.checkbox(&mut alphabetical, "Sort categories A–Z").changed() {
        state.set_order(if alphabetical {
            GroupOrder::Alphabetical
        } else {
            GroupOrder::FirstAppearance
        });
    }

    ui.separator();
    ui.label(format!(
        "{} of {} records shown",
        state.filtered.len(),
        state.table.as_ref().map_or(0, |t| t.len())
    ));

    ui.separator();
    ui.strong("Tree types");
    for (name, color) in state.tree_colors.legend_entries(state.order) {
        ui.label(RichText::new(format!("■ {name}")).color(color));
    }
}

/// Combo box offering "All" plus each option.  Returns the new selector when changed.
fn selector_combo(ui: &mut Ui, id: &str, current: &Selector, options: &[String]) -> Option<Selector> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(*current == Selector::All, "All")
                .clicked()
            {
                picked = Some(Selector::All);
            }
            for opt in options {
                let is_current = matches!(current, Selector::Only(v) if v == opt);
                if ui.selectable_label(is_current, opt).clicked() {
                    picked = Some(Selector::Only(opt.clone()));
                }
            }
        });
    picked.filter(|p| p != current)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_data = state.table.is_some();
            if ui
                .add_enabled(has_data, egui::Button::new("Export charts…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_data, egui::Button::new("Save filtered table…"))
                .clicked()
            {
                save_table_dialog(state);
                ui.close_menu();
            }
        });

        if ui
            .add_enabled(state.table.is_some(), egui::Button::new("Statistics"))
            .clicked()
        {
            state.show_stats = true;
        }

        ui.separator();

        if let Some(t) = &state.table {
            ui.label(format!(
                "{}: {} records loaded, {} visible",
                state.source_name.as_deref().unwrap_or("dataset"),
                t.len(),
                state.filtered.len()
            ));
        }
    });
}

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.label());
        }
    });
}

pub fn status_bar(ui: &mut Ui, state: &AppState) {
    let text = state.status_message.as_deref().unwrap_or("");
    let text = RichText::new(text);
    if state.status_is_error {
        ui.label(text.color(Color32::RED));
    } else {
        ui.label(text);
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open benchmark results")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        match state.load_file(&path) {
            Ok(()) => state.active_tab = Tab::Timing,
            Err(e) => log::warn!("{} was not loaded: {e}", path.display()),
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Choose a folder for the charts")
        .pick_folder();

    if let Some(dir) = dir {
        if let Err(e) = state.export_charts(&dir) {
            log::warn!("Charts were not exported to {}: {e}", dir.display());
        }
    }
}

fn save_table_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filtered table")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered_results.csv")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_filtered_csv(&path) {
            log::warn!("{} was not saved: {e}", path.display());
        }
    }
}
