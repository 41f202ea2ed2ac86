//! Audio recognition endpoint
//!
//! POST /recognize orchestrates the whole request: transport validation,
//! multipart extraction, the signed provider call, and normalization.
//! Both a successful match and a well-formed provider failure come back
//! as 200 with the `success` flag distinguishing them; only malformed
//! requests, configuration gaps, and transport faults use error statuses.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use tracing::{error, info};

use crate::models::RecognitionResult;
use crate::multipart::{self, MultipartError, AUDIO_FIELD};
use crate::services::normalizer;
use crate::{ApiError, ApiResult, AppState};

/// POST /recognize handler
///
/// **Request:** `multipart/form-data` with a binary `audio` field.
/// **Response:** normalized `RecognitionResult` JSON.
///
/// **Errors:**
/// - 400 Bad Request: wrong content type, missing boundary, missing field
/// - 405 Method Not Allowed: any method other than POST (axum routing)
/// - 500 Internal Server Error: missing credentials, provider transport fault
/// - provider status forwarded: non-2xx provider HTTP response
pub async fn recognize(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<RecognitionResult>> {
    // Credentials are checked before anything else; without them no
    // provider call is ever attempted.
    let config = state.config.as_ref().ok_or_else(|| {
        ApiError::Config("Recognition provider credentials not configured".to_string())
    })?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !content_type
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
    {
        return Err(ApiError::BadRequest(
            "Content-Type must be multipart/form-data".to_string(),
        ));
    }

    let boundary = multipart::boundary_from_content_type(content_type)
        .ok_or(MultipartError::MissingBoundary)?;

    let raw_body = decode_transport_body(&body, &boundary);
    let upload = multipart::extract(&raw_body, &boundary, AUDIO_FIELD)?;

    info!(
        bytes = upload.bytes.len(),
        filename = %upload.filename,
        "Received audio sample for recognition"
    );

    let response = match state.recognizer.recognize(upload, config).await {
        Ok(payload) => payload,
        Err(err) => {
            error!(error = %err, "Recognition provider call failed");
            state.set_last_error(err.to_string()).await;
            return Err(err.into());
        }
    };

    Ok(Json(normalizer::normalize(&response)))
}

/// Some transports hand the body over base64-encoded. If the boundary
/// delimiter is absent from the raw bytes but present after a base64
/// decode, the decoded bytes are the real body.
fn decode_transport_body(body: &[u8], boundary: &str) -> Vec<u8> {
    let delimiter = format!("--{boundary}");
    if contains(body, delimiter.as_bytes()) {
        return body.to_vec();
    }

    // CLI and serverless encoders commonly append a trailing newline or
    // wrap lines; the strict decoder rejects those, so strip ASCII
    // whitespace first.
    let compact: Vec<u8> = body
        .iter()
        .copied()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    if let Ok(decoded) = general_purpose::STANDARD.decode(&compact) {
        if contains(&decoded, delimiter.as_bytes()) {
            return decoded;
        }
    }

    body.to_vec()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    crate::multipart::find_subsequence(haystack, needle).is_some()
}

/// Build recognition routes
pub fn recognize_routes() -> Router<AppState> {
    Router::new().route("/recognize", post(recognize))
}
