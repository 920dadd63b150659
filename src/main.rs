//! Opalite - desktop dashboard for the Opalite note-taking service
//!
//! Pages are composed of typed content blocks (text, checkboxes, code,
//! embeds, nested pages, analytics) edited in a block editor and synced to
//! a hosted backend.

mod api;
mod app;
mod core;
mod ui;

use app::OpaliteApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Opalite...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Opalite"),
        ..Default::default()
    };

    eframe::run_native(
        "Opalite",
        native_options,
        Box::new(|cc| Ok(Box::new(OpaliteApp::new(cc)))),
    )
}
