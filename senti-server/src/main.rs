//! Senti Server - Main entry point.

use anyhow::Result;
use senti_common::config::{Config, ConfigSource};
use senti_common::logging::init_logging_with_exclusions;
use senti_core::VaderScorer;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let (config, source) = Config::load_and_validate()?;

    // Initialize logging
    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    tracing::info!("Senti Server v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File(path) => {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }
        ConfigSource::Defaults(path) => {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
        }
    }

    // One scorer for the whole process, shared by every request
    let scorer = Arc::new(VaderScorer::new());

    senti_server::start_server(&config, scorer).await
}
