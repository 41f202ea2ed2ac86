//! tunetag - Audio Recognition Service
//!
//! HTTP microservice wrapping the audio-fingerprint recognition provider.
//! POST an audio sample to /recognize, get back normalized track metadata.

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunetag::config::{self, ProviderConfig};
use tunetag::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tunetag audio recognition service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Missing credentials are not fatal: the service starts and reports a
    // configuration error per request until they are set.
    let provider_config = match ProviderConfig::from_env() {
        Ok(config) => {
            info!(host = %config.host, "Recognition provider configured");
            Some(config)
        }
        Err(err) => {
            warn!("Recognition provider not configured: {err}. /recognize will fail until TUNETAG_ACR_ACCESS_KEY and TUNETAG_ACR_ACCESS_SECRET are set.");
            None
        }
    };

    let port = config::port_from_env();
    let state = AppState::new(provider_config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{port}");
    info!("Health check: http://127.0.0.1:{port}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
