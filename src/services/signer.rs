//! Provider request signing
//!
//! The recognition provider authenticates each request with an HMAC-SHA1
//! signature over a canonical string. Field order, literal casing, and the
//! base64 encoding of the raw digest are all wire-compatibility
//! requirements: any deviation and the provider rejects the request with
//! an authentication failure.

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Data-type literal sent with every identification request
pub const DATA_TYPE: &str = "audio";

/// Signature scheme version literal
pub const SIGNATURE_VERSION: &str = "1";

/// Inputs to the canonical string, fixed once constructed.
#[derive(Debug, Clone)]
pub struct SignatureRequest {
    method: &'static str,
    endpoint_path: String,
    access_key: String,
    data_type: &'static str,
    signature_version: &'static str,
    timestamp: u64,
}

impl SignatureRequest {
    pub fn new(endpoint_path: &str, access_key: &str, timestamp: u64) -> Self {
        Self {
            method: "POST",
            endpoint_path: endpoint_path.to_string(),
            access_key: access_key.to_string(),
            data_type: DATA_TYPE,
            signature_version: SIGNATURE_VERSION,
            timestamp,
        }
    }

    /// Newline-joined canonical string, fields in provider-mandated order.
    pub fn canonical_string(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            self.method,
            self.endpoint_path,
            self.access_key,
            self.data_type,
            self.signature_version,
            self.timestamp
        )
    }
}

/// HMAC-SHA1 over the UTF-8 canonical string, base64-encoded raw digest.
pub fn sign(canonical: &str, secret: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(canonical.as_bytes());
    general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector_matches() {
        // RFC 2202-style vector; base64 of
        // de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9
        let signature = sign("The quick brown fox jumps over the lazy dog", "key");
        assert_eq!(signature, "3nybhbi3iqa8ino29wqQcBydtNk=");
    }

    #[test]
    fn signing_is_deterministic() {
        let request = SignatureRequest::new("/v1/identify", "ak", 1_700_000_000);
        let canonical = request.canonical_string();
        assert_eq!(sign(&canonical, "secret"), sign(&canonical, "secret"));
    }

    #[test]
    fn canonical_string_layout() {
        let request = SignatureRequest::new("/v1/identify", "my-key", 1_700_000_000);
        assert_eq!(
            request.canonical_string(),
            "POST\n/v1/identify\nmy-key\naudio\n1\n1700000000"
        );
    }

    #[test]
    fn any_field_change_alters_signature() {
        let secret = "secret";
        let base = SignatureRequest::new("/v1/identify", "ak", 1_700_000_000);
        let base_sig = sign(&base.canonical_string(), secret);

        let other_path = SignatureRequest::new("/v2/identify", "ak", 1_700_000_000);
        let other_key = SignatureRequest::new("/v1/identify", "bk", 1_700_000_000);
        let other_time = SignatureRequest::new("/v1/identify", "ak", 1_700_000_001);

        assert_ne!(sign(&other_path.canonical_string(), secret), base_sig);
        assert_ne!(sign(&other_key.canonical_string(), secret), base_sig);
        assert_ne!(sign(&other_time.canonical_string(), secret), base_sig);
        assert_ne!(sign(&base.canonical_string(), "other-secret"), base_sig);
    }
}
