//! # Property Intelligence
//!
//! Analysis services and listing lifecycle policies for a property
//! marketplace.
//!
//! This is the application entry point that initializes:
//! - Configuration loading
//! - Tracing/logging subsystem
//! - Scoring model store and retry rules
//! - HTTP server

use anyhow::Result;
use tracing::info;

use property_intelligence::config::Settings;
use property_intelligence::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Settings first: the log format is configurable
    let settings = Settings::load()?;
    property_intelligence::telemetry::init_tracing(&settings.logging);

    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
