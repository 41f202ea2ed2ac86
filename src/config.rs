//! Configuration resolution for tunetag
//!
//! Provider credentials are read once at startup from the environment and
//! treated as read-only afterwards. Missing credentials are not fatal for
//! the process: the service starts, and each `/recognize` request fails
//! with a configuration error until the credentials are set.

use thiserror::Error;
use tracing::warn;

/// Fixed identification endpoint path on the provider host.
///
/// Also the second field of the signature canonical string, so it must
/// match what is sent on the wire byte for byte.
pub const IDENTIFY_ENDPOINT: &str = "/v1/identify";

const DEFAULT_HOST: &str = "identify-eu-west-1.acrcloud.com";

/// Default HTTP bind port
pub const DEFAULT_PORT: u16 = 5740;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set in environment")]
    MissingVar(&'static str),
}

/// Immutable recognition-provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider host, without scheme (e.g. `identify-eu-west-1.acrcloud.com`).
    /// A host that already carries a scheme is used verbatim.
    pub host: String,
    /// Endpoint path on the host
    pub endpoint: String,
    /// Provider access key
    pub access_key: String,
    /// Provider access secret (HMAC signing key)
    pub access_secret: String,
}

impl ProviderConfig {
    /// Load provider configuration from the environment.
    ///
    /// `TUNETAG_ACR_HOST` is optional (defaults to the EU identification
    /// host); `TUNETAG_ACR_ACCESS_KEY` and `TUNETAG_ACR_ACCESS_SECRET` are
    /// required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("TUNETAG_ACR_HOST")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let access_key = require_var("TUNETAG_ACR_ACCESS_KEY")?;
        let access_secret = require_var("TUNETAG_ACR_ACCESS_SECRET")?;

        Ok(Self {
            host,
            endpoint: IDENTIFY_ENDPOINT.to_string(),
            access_key,
            access_secret,
        })
    }

    /// Full URL of the identification endpoint.
    pub fn endpoint_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}{}", self.host, self.endpoint)
        } else {
            format!("https://{}{}", self.host, self.endpoint)
        }
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

/// Resolve the HTTP bind port from `TUNETAG_PORT`, falling back to the
/// default on absence or parse failure.
pub fn port_from_env() -> u16 {
    match std::env::var("TUNETAG_PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid TUNETAG_PORT value '{raw}', using {DEFAULT_PORT}");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    }
}
