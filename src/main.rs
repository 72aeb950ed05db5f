//! Last-Mile Delivery Dashboard
//!
//! Loads a delivery CSV, cleans it, and shows delivery time metrics and
//! charts that can be sliced by weather, traffic, vehicle, area and category.

mod charts;
mod data;
mod gui;
mod pipeline;
mod stats;

use anyhow::{Context, Result};
use charts::StaticChartRenderer;
use clap::Parser;
use data::DEFAULT_DATA_PATH;
use eframe::egui;
use gui::DashboardApp;
use pipeline::{Dataset, ExportSummary};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "delivery_dashboard", about = "Last-Mile Delivery Analytics Dashboard")]
struct Cli {
    /// CSV file to analyse
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Write summary.json and PNG charts to this directory instead of
    /// opening the window
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
}

fn run_export(data_path: &Path, dir: &Path) -> Result<()> {
    let dataset = Dataset::load(data_path)?;
    let view = dataset
        .view(&dataset.default_selection())
        .context("aggregating dashboard view")?;

    let written = StaticChartRenderer::export_view(&view, dir)?;
    for path in &written {
        log::info!("Wrote {}", path.display());
    }

    let summary = ExportSummary::new(data_path, &dataset, &view);
    let summary_path = dir.join("summary.json");
    let file = std::fs::File::create(&summary_path)
        .with_context(|| format!("creating {}", summary_path.display()))?;
    serde_json::to_writer_pretty(file, &summary).context("writing summary.json")?;
    log::info!("Wrote {}", summary_path.display());

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Some(dir) = &cli.export {
        return run_export(&cli.data, dir);
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Last-Mile Delivery Analytics"),
        ..Default::default()
    };

    let data_path = cli.data.clone();
    eframe::run_native(
        "Last-Mile Delivery Analytics",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, &data_path)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
