mod app;
mod client;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod worker;

use std::sync::Arc;

use anyhow::Context;
use app::RosettaApp;
use client::HttpTransport;
use config::AppConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().context("loading configuration")?;
    let transport = Arc::new(HttpTransport::new(&config)?);
    log::info!("Processing service: {}", transport.base_url());
    let app = RosettaApp::new(&config, transport)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Rosetta Spectrum Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
