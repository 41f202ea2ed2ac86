//! tunetag - Audio Recognition Service
//!
//! Accepts uploaded audio samples over HTTP, forwards them - signed - to
//! the audio-fingerprint recognition provider, and normalizes the
//! provider's response into a stable client-facing result.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod multipart;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::config::ProviderConfig;
use crate::services::acr_client::RecognitionClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Provider configuration; `None` until credentials are set, in which
    /// case each recognition request fails with a configuration error
    pub config: Option<Arc<ProviderConfig>>,
    /// Outbound recognition client (shared connection pool)
    pub recognizer: Arc<RecognitionClient>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last provider error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: Option<ProviderConfig>) -> Self {
        Self {
            config: config.map(Arc::new),
            recognizer: Arc::new(RecognitionClient::new()),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_last_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }
}

/// Build application router
///
/// All origins are permitted; preflight OPTIONS is answered by the CORS
/// layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::recognize_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
