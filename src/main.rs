// SPDX-License-Identifier: GPL-3.0-only
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use workshop_downloader::config::Config;
use workshop_downloader::installer::{ItemDownloadService, StatusSink};
use workshop_downloader::logging::setup_logging;

#[derive(Parser)]
#[command(
    name = "workshop-downloader",
    version,
    about = "Download and unpack a Steam Workshop item"
)]
struct Cli {
    /// Workshop item URL with a numeric `id` query parameter
    url: String,

    /// Folder the item is installed under
    #[arg(short, long)]
    output: String,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn report_status(&self, status: &str) {
        println!("{}", status);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Initialize logging
    setup_logging(&config.log_level)?;

    info!("Starting workshop-downloader v{}", env!("CARGO_PKG_VERSION"));

    let mut service = ItemDownloadService::new(&config, Arc::new(ConsoleSink))?;
    service.set_destination_folder(&cli.output);

    let started = Instant::now();
    let item = service.handle_download(&cli.url).await?;

    println!(
        "Installed item {} ({} entries) into {}",
        item.workshop_item_id,
        item.files.len(),
        item.install_dir.display()
    );
    println!("Time Taken: {:.2?}", started.elapsed());

    Ok(())
}
