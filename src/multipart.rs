//! Minimal multipart/form-data extraction
//!
//! Pulls one named binary field (and its filename) out of a raw multipart
//! body. This is deliberately not a general multipart parser: segments are
//! split on the boundary delimiter at the byte level, the first matching
//! segment wins, and duplicate fields are neither merged nor validated.
//!
//! Byte fidelity is the point: the payload is binary audio data, so all
//! splitting and slicing happens on `&[u8]`. Only the header block of a
//! segment (ASCII by construction) is examined as text.
//!
//! Known limitation: a payload that itself contains the boundary delimiter
//! bytes is truncated at that point. RFC-compliant senders pick boundaries
//! that do not occur in the data.

use thiserror::Error;

/// Field name the inbound request must carry
pub const AUDIO_FIELD: &str = "audio";

/// Substituted when a segment carries no `filename="..."` attribute
pub const DEFAULT_FILENAME: &str = "sample.wav";

const DEFAULT_CONTENT_TYPE: &str = "audio/wav";

/// Extraction failures, both client-side bad-request conditions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultipartError {
    #[error("Missing boundary in multipart data")]
    MissingBoundary,

    #[error("Missing '{0}' field in multipart data")]
    FieldNotFound(String),
}

/// One extracted binary upload. Immutable once built; consumed exactly
/// once by the recognition client.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub declared_content_type: String,
}

/// Pull the `boundary=` token out of a `Content-Type` header value.
pub fn boundary_from_content_type(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("boundary="))
        .map(|token| token.trim_matches('"').to_string())
        .filter(|token| !token.is_empty())
}

/// Extract the named field from a raw multipart body.
pub fn extract(body: &[u8], boundary: &str, field: &str) -> Result<AudioUpload, MultipartError> {
    let delimiter = format!("--{boundary}");
    let name_marker = format!("name=\"{field}\"");

    for segment in split_on(body, delimiter.as_bytes()) {
        let Some((headers, payload)) = split_headers(segment) else {
            continue;
        };

        let header_text = String::from_utf8_lossy(headers);
        let Some(disposition) = header_line_value(&header_text, "content-disposition:") else {
            continue;
        };
        if !disposition.to_ascii_lowercase().starts_with("form-data") {
            continue;
        }

        // Match on whole disposition parameters, not a raw substring: a
        // `filename="audio"` attribute on some other field must not count
        // as `name="audio"`.
        let params: Vec<&str> = disposition.split(';').map(str::trim).collect();
        if !params.iter().any(|param| *param == name_marker) {
            continue;
        }

        let filename = params
            .iter()
            .find_map(|param| param.strip_prefix("filename=\""))
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let declared_content_type = header_line_value(&header_text, "content-type:")
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        return Ok(AudioUpload {
            bytes: trim_trailing_newline(payload).to_vec(),
            filename,
            declared_content_type,
        });
    }

    Err(MultipartError::FieldNotFound(field.to_string()))
}

/// Byte-level subsequence search.
pub(crate) fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Split `data` on every occurrence of `delimiter`. The leading preamble
/// and the trailing `--` epilogue come back as segments too; they fail the
/// header checks and are skipped by the caller.
fn split_on<'a>(data: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut segments = Vec::new();
    let mut rest = data;
    while let Some(idx) = find_subsequence(rest, delimiter) {
        segments.push(&rest[..idx]);
        rest = &rest[idx + delimiter.len()..];
    }
    segments.push(rest);
    segments
}

/// Split a segment at the first blank line into (headers, payload).
fn split_headers(segment: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(idx) = find_subsequence(segment, b"\r\n\r\n") {
        return Some((&segment[..idx], &segment[idx + 4..]));
    }
    if let Some(idx) = find_subsequence(segment, b"\n\n") {
        return Some((&segment[..idx], &segment[idx + 2..]));
    }
    None
}

/// The payload ends immediately before the line break that precedes the
/// next boundary delimiter.
fn trim_trailing_newline(payload: &[u8]) -> &[u8] {
    if payload.ends_with(b"\r\n") {
        &payload[..payload.len() - 2]
    } else if payload.ends_with(b"\n") {
        &payload[..payload.len() - 1]
    } else {
        payload
    }
}

fn header_line_value<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    headers.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case(name.trim_end_matches(':')) {
            Some(value.trim())
        } else {
            None
        }
    })
}
