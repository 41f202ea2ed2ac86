//! Recognition provider HTTP client
//!
//! Builds the signed multipart identification request and returns the
//! provider's JSON body as loosely structured data. No retries: the
//! recognition service may be slow on large samples, so callers own their
//! deadline; the client only carries a safety-net timeout.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::multipart;
use serde_json::Value;
use thiserror::Error;

use crate::config::ProviderConfig;
use crate::multipart::AudioUpload;
use crate::services::signer::{self, SignatureRequest, DATA_TYPE, SIGNATURE_VERSION};

const SAMPLE_CONTENT_TYPE: &str = "audio/wav";

/// Recognition client errors
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the audio identification endpoint
pub struct RecognitionClient {
    http: reqwest::Client,
}

impl RecognitionClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        Self { http }
    }

    /// Send one audio sample for identification.
    ///
    /// Non-2xx responses surface the raw provider body as error detail;
    /// they are not parsed further.
    pub async fn recognize(
        &self,
        upload: AudioUpload,
        config: &ProviderConfig,
    ) -> Result<Value, RecognitionError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let request = SignatureRequest::new(&config.endpoint, &config.access_key, timestamp);
        let signature = signer::sign(&request.canonical_string(), &config.access_secret);

        let sample_bytes = upload.bytes.len();
        let sample = multipart::Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(SAMPLE_CONTENT_TYPE)
            .map_err(|e| RecognitionError::Network(format!("multipart part: {e}")))?;

        let form = multipart::Form::new()
            .part("sample", sample)
            .text("sample_bytes", sample_bytes.to_string())
            .text("access_key", config.access_key.clone())
            .text("data_type", DATA_TYPE)
            .text("signature_version", SIGNATURE_VERSION)
            .text("signature", signature)
            .text("timestamp", timestamp.to_string());

        let url = config.endpoint_url();
        tracing::debug!(sample_bytes, %url, "Sending identification request");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| RecognitionError::Parse(e.to_string()))?;

        // Fully qualified: inside the macro, tracing's own `Value` trait
        // shadows the serde_json import.
        tracing::info!(
            status_code = payload.pointer("/status/code").and_then(serde_json::Value::as_i64),
            "Provider response received"
        );

        Ok(payload)
    }
}

impl Default for RecognitionClient {
    fn default() -> Self {
        Self::new()
    }
}
