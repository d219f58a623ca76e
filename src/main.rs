use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::io;
use std::sync::Arc;

use momentum_dashboard::api::ScannerClient;
use momentum_dashboard::app::{App, Renderer};
use momentum_dashboard::cli::Cli;
use momentum_dashboard::config::{Config, DEFAULT_CONFIG_PATH};
use momentum_dashboard::console::{spawn_command_reader, ConsoleRenderer, HELP};
use momentum_dashboard::logging;
use momentum_dashboard::store::ApplyOutcome;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.debug, cli.log_file.as_deref()).context("Failed to initialise logging")?;

    info!("Starting momentum dashboard...");

    let mut config = match Config::resolve(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            let config_path = cli.config.unwrap_or_else(|| DEFAULT_CONFIG_PATH.into());
            eprintln!("Failed to load configuration from {:?}: {}", config_path, e);
            return Err(anyhow::anyhow!("Configuration loading failed: {}", e));
        }
    };
    config.apply_overrides(cli.base_url.as_deref());
    config.validate().context("Invalid configuration")?;
    info!("Configuration loaded successfully.");

    let client = ScannerClient::new(&config.api).context("Failed to build scanner client")?;
    let mut app = App::new(Arc::new(client), &config);
    let mut renderer = ConsoleRenderer::new(io::stdout());

    if cli.once {
        match app.run_once().await {
            ApplyOutcome::Applied => {}
            outcome => warn!("Scan did not apply ({:?})", outcome),
        }
        renderer.render(&app.screen())?;
        if let Some(e) = app.store().last_error() {
            error!("Last scan error: {}", e);
        }
        return Ok(());
    }

    renderer.notice("Type a command and press enter.")?;
    info!("{}", HELP);
    let commands = spawn_command_reader();
    app.run(commands, &mut renderer).await?;
    Ok(())
}
