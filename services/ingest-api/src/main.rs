//! GeoJSON ingestion HTTP service.
//!
//! Accepts FeatureCollections via `POST /ingest` (file upload or raw
//! JSON body), validates and persists them into PostGIS, and serves
//! read-only feature queries.

mod config;
mod server;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::ServiceConfig;
use server::AppState;
use storage::FeatureStore;

#[derive(Parser, Debug)]
#[command(name = "ingest-api")]
#[command(about = "GeoJSON ingestion service")]
struct Args {
    /// Drop and recreate the feature table before serving (destructive)
    #[arg(long)]
    reset_schema: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting GeoJSON ingestion service");

    let config = ServiceConfig::from_env();
    info!(
        host = %config.store.host,
        database = %config.store.database,
        "Loaded configuration"
    );

    // An unreachable store is fatal: fail startup instead of retrying.
    let store = FeatureStore::connect(&config.store).await?;
    store
        .migrate(args.reset_schema || config.store.reset_on_start)
        .await?;

    let state = Arc::new(AppState {
        store: Arc::new(store),
    });

    server::start_server(state, config.port).await
}
