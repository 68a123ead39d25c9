//! ReqTrack server entrypoint

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::{AppConfig, LogFormat, LoggingConfig};
use requirements_service::RequirementsServiceModule;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "reqtrack-server", version, about = "ReqTrack requirements tracking API")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "REQTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        let mut shown = config.clone();
        shown.requirements_service.jwt_secret = "***".to_string();
        println!("{shown:#?}");
        return Ok(());
    }

    init_tracing(&config.logging)?;
    run(config).await
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("invalid log filter")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}

async fn run(config: AppConfig) -> Result<()> {
    let db = requirements_service::connect(&config.database.url, config.database.max_connections)
        .await?;
    let module = RequirementsServiceModule::init(config.requirements_service, db).await?;
    let app = module.register_rest(axum::Router::new());

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "ReqTrack server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("ReqTrack server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
