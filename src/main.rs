use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use weather_gateway::{GatewayConfig, OpenWeatherClient, config::API_KEY_ENV, telemetry, web};

/// HTTP gateway that reshapes OpenWeatherMap responses for browser clients
#[derive(Parser, Debug)]
#[command(name = "weather-gateway", version, about)]
struct Cli {
    /// Path to a TOML config file (default: ./weather-gateway.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address override
    #[arg(long)]
    host: Option<String>,

    /// Listen port override
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = GatewayConfig::load_from_path(cli.config)?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    telemetry::init(&config.logging)?;

    if config.weather.api_key.is_none() {
        tracing::warn!(
            "{} is not set, weather and forecast requests will fail until it is configured",
            API_KEY_ENV
        );
    }

    let provider = Arc::new(OpenWeatherClient::new(&config.weather)?);
    web::run(&config, provider).await
}
