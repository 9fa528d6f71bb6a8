#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use log::info;

use crop_web::config::AppConfig;
use crop_web::ui::CropperApp;

#[derive(Parser, Debug)]
#[command(name = "crop_web", version, about = "A simple tool to crop images")]
struct Cli {
    /// Image file or http(s) URL to open on startup
    source: Option<String>,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory exported crops are written to
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Proxy used when a direct fetch fails; `{url}` is replaced by the image URL
    #[arg(long)]
    proxy: Option<String>,

    /// JPEG quality, 1-100
    #[arg(long)]
    quality: Option<u8>,

    #[arg(long, conflicts_with = "light")]
    dark: bool,

    #[arg(long)]
    light: bool,
}

impl Cli {
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(dir) = &self.out_dir {
            config.output_dir = dir.clone();
        }
        if let Some(proxy) = &self.proxy {
            config.proxy_template = proxy.clone();
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        if self.dark {
            config.dark_mode = true;
        }
        if self.light {
            config.dark_mode = false;
        }
        config.normalized()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::load(cli.config.as_deref()).context("Failed to load config")?);
    info!("writing crops to {}", config.output_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Crop Web",
        options,
        Box::new(move |cc| Ok(Box::new(CropperApp::new(cc, config, cli.source)?))),
    )
    .map_err(|e| anyhow::anyhow!("Error running native app: {}", e))
}
