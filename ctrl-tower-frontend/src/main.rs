mod app;
mod keys;
mod logging;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use ctrl_tower_backend::config::{DEFAULT_CONFIG_PATH, TowerConfig};
use ctrl_tower_backend::AirLabsClient;
use ctrl_tower_common::SelectedAirport;
use std::path::PathBuf;
use std::sync::Arc;

use app::App;

#[derive(Parser)]
#[command(name = "ctrl-tower")]
#[command(about = "Airport departures board for the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// IATA code of the airport to open at startup
    #[arg(long)]
    airport: Option<String>,

    #[arg(long)]
    log_level: Option<String>,
}

/// Name an airport given by bare code. Falls back to the AirLabs airport
/// lookup when the built-in table does not know it.
async fn resolve_airport(client: &AirLabsClient, code: &str) -> SelectedAirport {
    let airport = SelectedAirport::from_code(code);
    if airport.has_name() {
        return airport;
    }

    match client.fetch_airport(&airport.code).await {
        Ok(Some(info)) => match info.name {
            Some(name) => SelectedAirport::new(airport.code, name),
            None => airport,
        },
        Ok(None) => {
            tracing::warn!("AirLabs has no airport with code {}", airport.code);
            airport
        }
        Err(e) => {
            tracing::warn!("Failed to look up airport {}: {}", airport.code, e);
            airport
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let mut config = TowerConfig::load_or_default(&cli.config)?;
    let override_warnings = config.apply_env_overrides();
    if let Some(code) = cli.airport {
        config.display.default_airport = Some(code);
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate()?;

    let _logging_guard = logging::init_logging(&config.log_dir, "ctrl-tower", &config.log_level)?;

    tracing::info!("Ctrl-Tower starting...");
    if config_found {
        tracing::info!("Loaded config from {}", cli.config.display());
    } else {
        tracing::info!("Config file {} not found, using defaults", cli.config.display());
    }
    for warning in &override_warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!(
        "AirLabs at {} (timeout {}s), {} flights per page",
        config.api.base_url,
        config.api.timeout_secs,
        config.display.flights_per_page
    );

    let client = Arc::new(AirLabsClient::new(&config.api)?);
    let mut app = App::new(
        client.clone(),
        client.clone(),
        config.display.flights_per_page,
        config.display.refresh_interval(),
    );

    if let Some(code) = config.display.default_airport() {
        let airport = resolve_airport(&client, &code).await;
        tracing::info!("Opening board for {} ({})", airport.code, airport.name);
        app.open_airport(airport);
    }

    // The UI loop blocks on terminal input; keep it off the async workers
    tokio::task::block_in_place(|| app.run()).context("Terminal UI failed")?;

    Ok(())
}
