use anyhow::Result;
use eframe::egui;
use perma_dashboard::app::PermaDashboardApp;
use perma_dashboard::config::DashboardConfig;

fn main() -> Result<()> {
    env_logger::init();

    // Optional first argument: survey CSV path or URL.
    let config = DashboardConfig::resolve(std::env::args().nth(1))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Workplace Wellbeing Dashboard (PERMA+V)",
        options,
        Box::new(move |_cc| Ok(Box::new(PermaDashboardApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
