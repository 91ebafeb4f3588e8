//! Senti Server - HTTP adapter for review sentiment analysis.
//!
//! Accepts review documents as a file upload or a raw JSON body, runs them through
//! `senti_core`, and returns labels with summary counts.
//!
//! ## Architecture
//!
//! ```text
//! Client → trace middleware → handler → senti_core::analyze_upload(scorer)
//!                                              ↓
//!                                      AnalysisResult / UploadError
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod middleware;
pub mod routes;

pub use routes::{AnalyzeResponse, AppState, ErrorResponse, HealthResponse};

use axum::Router;
use senti_common::config::Config;
use senti_core::SentimentScorer;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Service name used in logs and health responses.
pub const SERVICE_NAME: &str = "senti-server";

/// Build the router with all routes and middleware.
pub fn build_router(config: &Config, scorer: Arc<dyn SentimentScorer>) -> Router {
    let router = routes::build_all_routes(config, scorer);

    if config.server.cors_permissive {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Start the server and run until Ctrl-C.
pub async fn start_server(
    config: &Config,
    scorer: Arc<dyn SentimentScorer>,
) -> anyhow::Result<()> {
    let addr = SocketAddr::from((
        config.bind_address().parse::<std::net::IpAddr>()?,
        config.port(),
    ));

    let router = build_router(config, scorer);

    tracing::info!("Starting Senti Server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Senti Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
