//! Strata - multi-layer timeline editor
//!
//! Entry point: logging, configuration, and the eframe event loop.

mod app;
mod library;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use std::path::PathBuf;
use strata_core::TimelineConfig;
use strata_timeline::TimelineDocument;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::StrataApp;

#[derive(Debug, Parser)]
#[command(name = "strata")]
#[command(about = "Multi-layer video timeline editor")]
#[command(version)]
struct Args {
    /// Timeline config file (overrides STRATA_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project file to open, created on first save if missing
    project: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Strata starting...");

    let args = Args::parse();
    let config = TimelineConfig::resolve(args.config.as_deref())
        .context("Failed to load timeline config")?;

    let document = match &args.project {
        Some(path) if path.exists() => TimelineDocument::open(path, config)
            .with_context(|| format!("Failed to open project {}", path.display()))?,
        _ => TimelineDocument::new(config),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("Strata"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Strata",
        options,
        Box::new(move |cc| Ok(Box::new(StrataApp::new(cc, document, args.project)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {}", e))?;

    Ok(())
}
