use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, stats, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct TreeBenchApp {
    pub state: AppState,
}

impl eframe::App for TreeBenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: status line ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::tab_bar(ui, &mut self.state);
            ui.separator();
            match self.state.active_tab {
                Tab::Timing => plot::timing_tab(ui, &self.state),
                Tab::Structure => plot::structure_tab(ui, &self.state),
                Tab::Comparison => plot::comparison_tab(ui, &mut self.state),
                Tab::Data => table::data_tab(ui, &self.state),
            }
        });

        stats::stats_window(ctx, &mut self.state);
    }
}
