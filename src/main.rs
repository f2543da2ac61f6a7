#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

mod app;
mod modules;
mod style;

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

fn main() -> eframe::Result<()> {
    init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting batch image converter");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 760.0])
            .with_min_inner_size([560.0, 480.0])
            .with_drag_and_drop(true)
            .with_title("Batch Image Converter"),
        ..Default::default()
    };
    eframe::run_native(
        "Batch Image Converter",
        options,
        Box::new(|cc| Ok(Box::new(app::ConverterApp::new(cc)))),
    )
}
