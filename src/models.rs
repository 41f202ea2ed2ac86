//! Client-facing result types
//!
//! The normalized recognition result is the external contract of this
//! service: a tagged union distinguished by its `success` flag, returned
//! with HTTP 200 for both outcomes.

use serde::Serialize;
use serde_json::Value;

/// Why a recognition attempt did not produce a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Provider found no match for the sample (code 1001)
    NotFound,
    /// Provider rejected the access key or signature (code 3001)
    InvalidCredentials,
    /// Provider rate limit exceeded (code 3003)
    RateLimited,
    /// Any other provider status, or a malformed success payload
    Unknown,
}

/// Successful recognition, built from the provider's first music match
#[derive(Debug, Clone, Serialize)]
pub struct TrackMatch {
    /// Always `true`
    pub success: bool,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// First four characters of the release date, or `"Unknown"`
    pub year: String,
    /// Match confidence, 0..=100 percent
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apple_music_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_art_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// Well-formed provider failure (no match, bad credentials, ...)
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionFailure {
    /// Always `false`
    pub success: bool,
    /// Provider status code, or -1 when the response carried none
    pub code: i64,
    pub reason: FailureReason,
    pub message: String,
    /// Raw provider payload, attached on the Unknown branch for diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl RecognitionFailure {
    pub fn new(code: i64, reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            reason,
            message: message.into(),
            raw: None,
        }
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// Normalized recognition outcome
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RecognitionResult {
    Success(TrackMatch),
    Failure(RecognitionFailure),
}
