//! Callback signature verification.
//!
//! The gateway documents no callback authentication, so the service
//! requires its own: HMAC-SHA256 over `"{timestamp}.{body}"`, delivered as
//! `X-Callback-Signature: t=<unix-ts>,v1=<hex>`. Verification fails closed;
//! an unverified payload never reaches the status store.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Signature header carried by gateway callbacks
pub const SIGNATURE_HEADER: &str = "x-callback-signature";

/// Signature verification failures
#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("signature header missing")]
    Missing,

    #[error("signature malformed: {0}")]
    Malformed(String),

    #[error("signature timestamp outside tolerance ({age}s old, tolerance {tolerance}s)")]
    Expired { age: u64, tolerance: u64 },

    #[error("signature mismatch")]
    Mismatch,
}

/// Verifier (and, for tests and outbound use, signer) for callback bodies
#[derive(Clone)]
pub struct CallbackVerifier {
    secret: SecretString,
    tolerance_secs: u64,
}

impl CallbackVerifier {
    /// Create a verifier with the default 5 minute tolerance
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            tolerance_secs: 300,
        }
    }

    /// Set the timestamp tolerance in seconds
    pub fn with_tolerance(mut self, seconds: u64) -> Self {
        self.tolerance_secs = seconds;
        self
    }

    /// Sign a payload with the current timestamp
    pub fn sign(&self, payload: &[u8]) -> String {
        self.sign_with_timestamp(payload, chrono::Utc::now().timestamp())
    }

    /// Sign a payload with a specific timestamp
    pub fn sign_with_timestamp(&self, payload: &[u8], timestamp: i64) -> String {
        let digest = self.digest(timestamp, payload);
        format!("t={timestamp},v1={digest}")
    }

    /// Verify a signature header against the raw body.
    ///
    /// Fails on a missing or malformed header, a timestamp outside the
    /// tolerance window, or a digest mismatch.
    pub fn verify(&self, payload: &[u8], header: Option<&str>) -> Result<(), SignatureError> {
        let header = header.ok_or(SignatureError::Missing)?;
        let (timestamp, signature) = parse_header(header)?;

        let now = chrono::Utc::now().timestamp();
        let age = (now - timestamp).unsigned_abs();
        if age > self.tolerance_secs {
            return Err(SignatureError::Expired {
                age,
                tolerance: self.tolerance_secs,
            });
        }

        let expected = self.digest(timestamp, payload);
        if !constant_time_eq(signature, &expected) {
            return Err(SignatureError::Mismatch);
        }
        Ok(())
    }

    fn digest(&self, timestamp: i64, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key size");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }
}

fn parse_header(header: &str) -> Result<(i64, &str), SignatureError> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        match part.split_once('=') {
            Some(("t", t)) => timestamp = Some(t),
            Some(("v1", v)) => signature = Some(v),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| SignatureError::Malformed("missing t= component".into()))?
        .parse()
        .map_err(|_| SignatureError::Malformed("timestamp is not an integer".into()))?;
    let signature =
        signature.ok_or_else(|| SignatureError::Malformed("missing v1= component".into()))?;

    Ok((timestamp, signature))
}

/// Constant-time comparison to keep digest checks timing-safe
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier(secret: &str) -> CallbackVerifier {
        CallbackVerifier::new(SecretString::new(secret.to_string().into()))
    }

    #[test]
    fn test_sign_and_verify() {
        let v = verifier("callback-secret");
        let payload = br#"{"payment_id":"P-1"}"#;

        let header = v.sign(payload);
        assert!(header.starts_with("t="));
        assert!(header.contains(",v1="));
        assert!(v.verify(payload, Some(&header)).is_ok());
    }

    #[test]
    fn test_missing_header_rejected() {
        let v = verifier("callback-secret");
        assert!(matches!(
            v.verify(b"payload", None),
            Err(SignatureError::Missing)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = verifier("secret-a");
        let v = verifier("secret-b");

        let header = signer.sign(b"payload");
        assert!(matches!(
            v.verify(b"payload", Some(&header)),
            Err(SignatureError::Mismatch)
        ));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let v = verifier("callback-secret");
        let header = v.sign(br#"{"payment_status":"PENDING"}"#);
        assert!(matches!(
            v.verify(br#"{"payment_status":"PAID"}"#, Some(&header)),
            Err(SignatureError::Mismatch)
        ));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let v = verifier("callback-secret").with_tolerance(60);
        let old = chrono::Utc::now().timestamp() - 1000;
        let header = v.sign_with_timestamp(b"payload", old);
        assert!(matches!(
            v.verify(b"payload", Some(&header)),
            Err(SignatureError::Expired { .. })
        ));
    }

    #[test]
    fn test_malformed_header_rejected() {
        let v = verifier("callback-secret");
        assert!(matches!(
            v.verify(b"payload", Some("v1=deadbeef")),
            Err(SignatureError::Malformed(_))
        ));
        assert!(matches!(
            v.verify(b"payload", Some("t=notanumber,v1=deadbeef")),
            Err(SignatureError::Malformed(_))
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "ab"));
    }

    #[test]
    fn test_same_input_same_signature() {
        let v = verifier("callback-secret");
        let a = v.sign_with_timestamp(b"payload", 1_700_000_000);
        let b = v.sign_with_timestamp(b"payload", 1_700_000_000);
        assert_eq!(a, b);
    }
}
