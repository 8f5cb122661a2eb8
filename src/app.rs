use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PermaDashboardApp {
    pub state: AppState,
}

impl PermaDashboardApp {
    /// Build the app and perform the session's first load.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        log::info!("Loading survey from {}", state.source());
        state.load();
        Self { state }
    }
}

impl eframe::App for PermaDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.refresh_if_stale();
        if let Some(ttl) = self.state.cache_ttl() {
            ctx.request_repaint_after(ttl);
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and summary ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("No survey loaded  (File → Open… or File → Reload)");
                });
                return;
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.columns(2, |cols| {
                        cols[0].heading("🌟 PERMA+V Radar Chart");
                        plot::radar_plot(&mut cols[0], &self.state);
                        cols[1].heading("📈 Distribution by Dimension");
                        plot::distribution_plot(&mut cols[1], &self.state);
                    });
                    ui.separator();
                    ui.heading("📊 Summary Statistics");
                    table::summary_table(ui, &self.state);
                });
        });
    }
}
