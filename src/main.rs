mod app;
mod background;
mod cli;
mod config;
mod content;
mod db;
mod domain;
mod infrastructure;
mod messaging;
mod ui;

use anyhow::Result;
use clap::Parser;
use infrastructure::{directories, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let app = app::FormFillerApp::initialize(config, paths).await?;
    app.run(cli.command).await
}
