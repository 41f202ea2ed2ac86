//! Provider response normalization
//!
//! Maps the provider's loosely structured JSON into the stable
//! `RecognitionResult` contract. Total over its input: every status code,
//! including unrecognized ones and responses with no status at all, maps
//! to some result. Only `status.code` may be assumed present; every other
//! access navigates optional fields and falls back to a documented
//! default.

use serde_json::Value;

use crate::models::{FailureReason, RecognitionFailure, RecognitionResult, TrackMatch};

const STATUS_SUCCESS: i64 = 0;
const STATUS_NO_MATCH: i64 = 1001;
const STATUS_INVALID_CREDENTIALS: i64 = 3001;
const STATUS_RATE_LIMITED: i64 = 3003;

/// Substituted provider code when the response carried none
const CODE_MISSING: i64 = -1;

/// Normalize a provider response into the client-facing result.
pub fn normalize(response: &Value) -> RecognitionResult {
    let code = response.pointer("/status/code").and_then(Value::as_i64);

    match code {
        Some(STATUS_SUCCESS) => match response.pointer("/metadata/music/0") {
            Some(music) => RecognitionResult::Success(build_match(music)),
            None => RecognitionResult::Failure(
                RecognitionFailure::new(
                    STATUS_SUCCESS,
                    FailureReason::Unknown,
                    "Provider reported success without any music matches",
                )
                .with_raw(response.clone()),
            ),
        },
        Some(STATUS_NO_MATCH) => RecognitionResult::Failure(RecognitionFailure::new(
            STATUS_NO_MATCH,
            FailureReason::NotFound,
            "No match found for the audio sample",
        )),
        Some(STATUS_INVALID_CREDENTIALS) => RecognitionResult::Failure(RecognitionFailure::new(
            STATUS_INVALID_CREDENTIALS,
            FailureReason::InvalidCredentials,
            "Recognition provider rejected the access credentials",
        )),
        Some(STATUS_RATE_LIMITED) => RecognitionResult::Failure(RecognitionFailure::new(
            STATUS_RATE_LIMITED,
            FailureReason::RateLimited,
            "Recognition provider rate limit exceeded",
        )),
        other => {
            let message = response
                .pointer("/status/msg")
                .and_then(Value::as_str)
                .unwrap_or("Unrecognized provider status")
                .to_string();
            RecognitionResult::Failure(
                RecognitionFailure::new(
                    other.unwrap_or(CODE_MISSING),
                    FailureReason::Unknown,
                    message,
                )
                .with_raw(response.clone()),
            )
        }
    }
}

/// Build a success record from one music match. Ties and multiple matches
/// are never re-ranked; the caller always hands in entry 0.
fn build_match(music: &Value) -> TrackMatch {
    let title = music
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Unknown Title")
        .to_string();

    let artist = music
        .pointer("/artists/0/name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown Artist")
        .to_string();

    let album = music
        .pointer("/album/name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown Album")
        .to_string();

    let year = music
        .get("release_date")
        .and_then(Value::as_str)
        .map(|date| date.chars().take(4).collect())
        .unwrap_or_else(|| "Unknown".to_string());

    // A zero score falls back to the default alongside an absent one.
    // Quirk inherited from the original contract; see DESIGN.md.
    let confidence = match music.get("score").and_then(Value::as_f64) {
        Some(score) if score != 0.0 => ((score * 100.0).round() as i64).clamp(0, 100) as u8,
        _ => 95,
    };

    let duration_seconds = music
        .get("duration_ms")
        .and_then(Value::as_u64)
        .map(|ms| ms / 1000);

    let spotify_url = music
        .pointer("/external_metadata/spotify/track/id")
        .and_then(Value::as_str)
        .map(|id| format!("https://open.spotify.com/track/{id}"));

    let youtube_url = music
        .pointer("/external_metadata/youtube/vid")
        .and_then(Value::as_str)
        .map(|vid| format!("https://www.youtube.com/watch?v={vid}"));

    let apple_music_url = music
        .pointer("/external_metadata/applemusic/url")
        .and_then(Value::as_str)
        .map(str::to_string);

    let cover_art_url = music
        .pointer("/external_metadata/applemusic/artwork_url")
        .and_then(Value::as_str)
        .map(str::to_string);

    let preview_url = music
        .pointer("/external_metadata/applemusic/previews/0/url")
        .and_then(Value::as_str)
        .map(str::to_string);

    TrackMatch {
        success: true,
        title,
        artist,
        album,
        year,
        confidence,
        duration_seconds,
        spotify_url,
        youtube_url,
        apple_music_url,
        cover_art_url,
        preview_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success_response(music: Value) -> Value {
        json!({
            "status": { "code": 0, "msg": "Success" },
            "metadata": { "music": [music] }
        })
    }

    #[test]
    fn full_match_maps_all_fields() {
        let response = success_response(json!({
            "title": "Bohemian Rhapsody",
            "artists": [{ "name": "Queen" }, { "name": "Someone Else" }],
            "album": { "name": "A Night at the Opera" },
            "release_date": "1975-10-31",
            "score": 0.97,
            "duration_ms": 354_320,
            "external_metadata": {
                "spotify": { "track": { "id": "4u7EnebtmKWzUH433cf5Qv" } },
                "youtube": { "vid": "fJ9rUzIMcZQ" },
                "applemusic": {
                    "url": "https://music.apple.com/track/1",
                    "artwork_url": "https://artwork.example/cover.jpg",
                    "previews": [{ "url": "https://audio.example/preview.m4a" }]
                }
            }
        }));

        let RecognitionResult::Success(track) = normalize(&response) else {
            panic!("expected success");
        };
        assert_eq!(track.title, "Bohemian Rhapsody");
        assert_eq!(track.artist, "Queen");
        assert_eq!(track.album, "A Night at the Opera");
        assert_eq!(track.year, "1975");
        assert_eq!(track.confidence, 97);
        assert_eq!(track.duration_seconds, Some(354));
        assert_eq!(
            track.spotify_url.as_deref(),
            Some("https://open.spotify.com/track/4u7EnebtmKWzUH433cf5Qv")
        );
        assert_eq!(
            track.youtube_url.as_deref(),
            Some("https://www.youtube.com/watch?v=fJ9rUzIMcZQ")
        );
        assert_eq!(
            track.preview_url.as_deref(),
            Some("https://audio.example/preview.m4a")
        );
    }

    #[test]
    fn bare_match_falls_back_to_defaults() {
        let RecognitionResult::Success(track) = normalize(&success_response(json!({}))) else {
            panic!("expected success");
        };
        assert_eq!(track.title, "Unknown Title");
        assert_eq!(track.artist, "Unknown Artist");
        assert_eq!(track.album, "Unknown Album");
        assert_eq!(track.year, "Unknown");
        assert_eq!(track.confidence, 95);
        assert_eq!(track.duration_seconds, None);
        assert!(track.spotify_url.is_none());
        assert!(track.youtube_url.is_none());
        assert!(track.apple_music_url.is_none());
        assert!(track.cover_art_url.is_none());
        assert!(track.preview_url.is_none());
    }

    #[test]
    fn zero_score_falls_back_to_default_confidence() {
        let RecognitionResult::Success(track) =
            normalize(&success_response(json!({ "score": 0.0 })))
        else {
            panic!("expected success");
        };
        assert_eq!(track.confidence, 95);
    }

    #[test]
    fn first_match_wins_regardless_of_array_length() {
        let response = json!({
            "status": { "code": 0 },
            "metadata": { "music": [
                { "title": "First", "score": 0.5 },
                { "title": "Second", "score": 0.99 }
            ]}
        });

        let RecognitionResult::Success(track) = normalize(&response) else {
            panic!("expected success");
        };
        assert_eq!(track.title, "First");
        assert_eq!(track.confidence, 50);
    }

    #[test]
    fn success_without_music_entries_is_unknown_failure() {
        let response = json!({ "status": { "code": 0 }, "metadata": { "music": [] } });
        let RecognitionResult::Failure(failure) = normalize(&response) else {
            panic!("expected failure");
        };
        assert_eq!(failure.reason, FailureReason::Unknown);
        assert!(failure.raw.is_some());
    }

    #[test]
    fn known_failure_codes_map_to_reasons() {
        let cases = [
            (1001, FailureReason::NotFound),
            (3001, FailureReason::InvalidCredentials),
            (3003, FailureReason::RateLimited),
        ];
        for (code, reason) in cases {
            let response = json!({ "status": { "code": code } });
            let RecognitionResult::Failure(failure) = normalize(&response) else {
                panic!("expected failure for code {code}");
            };
            assert_eq!(failure.code, code);
            assert_eq!(failure.reason, reason);
            assert!(failure.raw.is_none());
        }
    }

    #[test]
    fn unrecognized_code_attaches_raw_payload() {
        let response = json!({ "status": { "code": 2004, "msg": "Can't generate fingerprint" } });
        let RecognitionResult::Failure(failure) = normalize(&response) else {
            panic!("expected failure");
        };
        assert_eq!(failure.code, 2004);
        assert_eq!(failure.reason, FailureReason::Unknown);
        assert_eq!(failure.message, "Can't generate fingerprint");
        assert_eq!(failure.raw, Some(response));
    }

    #[test]
    fn missing_status_is_total() {
        let RecognitionResult::Failure(failure) = normalize(&json!({})) else {
            panic!("expected failure");
        };
        assert_eq!(failure.code, -1);
        assert_eq!(failure.reason, FailureReason::Unknown);
        assert!(failure.raw.is_some());
    }
}
