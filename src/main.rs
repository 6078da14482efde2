mod app;
mod ui;

use anyhow::Context;
use app::BizboardApp;
use bizboard::DashboardConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env().context("loading dashboard config")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Comprehensive Data Processing Application",
        options,
        Box::new(|_cc| Ok(Box::new(BizboardApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
