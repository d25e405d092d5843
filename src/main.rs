//! TPQA Dashboard - County Survey Tabulation Viewer
//!
//! Loads the per-county quality assurance tables and draws the charts chosen
//! in the side panel, with PNG download for each chart.

mod catalog;
mod charts;
mod config;
mod data;
mod export;
mod gui;
mod selector;

use anyhow::{anyhow, Context};
use catalog::{Catalog, Region};
use charts::{ChartPlotter, Palette};
use config::AppConfig;
use eframe::egui;
use gui::DashboardApp;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load_from_env().context("Failed to load dashboard configuration")?;
    let palette = Palette::from_config(&config).context("Invalid chart palette")?;
    let plotter = ChartPlotter::new(config.chart_width, config.chart_height, palette);

    let catalogs = Region::ALL
        .iter()
        .map(|&region| {
            Catalog::for_region(region, &config.data_root, &config.consent_file)
                .map(|catalog| (region, Arc::new(catalog)))
                .with_context(|| format!("Invalid dataset catalog for {}", region))
        })
        .collect::<anyhow::Result<HashMap<_, _>>>()?;
    info!(
        data_root = %config.data_root.display(),
        region = %config.default_region,
        "starting dashboard"
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("TPQA Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "TPQA Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config, catalogs, plotter)))),
    )
    .map_err(|e| anyhow!("Dashboard window failed: {}", e))
}
