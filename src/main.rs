//! # Scheduling API Main Entry Point
//!
//! This is the main entry point for the Scheduling API service.

use std::sync::Arc;

use scheduling::engine::PassthroughEngine;
use scheduling::migration::{Migrator, MigratorTrait};
use scheduling::{config::ConfigLoader, db::init_pool, server::run_server, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    telemetry::init_tracing(&config);

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let db = init_pool(&config).await?;
    Migrator::up(&db, None).await?;

    // The passthrough engine echoes submitted placements; deployments swap in
    // a real solver behind the same trait.
    run_server(config, db, Arc::new(PassthroughEngine)).await
}
