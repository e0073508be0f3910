//! Webhook signature verification.
//!
//! Deliveries carry a signature header of the form `t=<unix>,v1=<hex>`
//! where the hex value is HMAC-SHA256 over `{timestamp}.{raw body}`.
//! Verification is constant-time and enforces a freshness window to
//! reject replays.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use tenanthub_core::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Verifies webhook delivery signatures against a shared secret.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: String,
    tolerance_seconds: i64,
}

impl SignatureVerifier {
    /// Create a verifier with the given shared secret and freshness
    /// tolerance in seconds.
    pub fn new(secret: impl Into<String>, tolerance_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_seconds,
        }
    }

    /// Verify a signature header against the raw request body.
    ///
    /// Fails with an authentication error when the header is malformed,
    /// the timestamp falls outside the tolerance window, or the digest
    /// does not match.
    pub fn verify(&self, header: &str, body: &[u8], now_unix: i64) -> Result<(), AppError> {
        let (timestamp, provided_hex) = parse_header(header)?;

        if (now_unix - timestamp).abs() > self.tolerance_seconds {
            return Err(AppError::authentication(
                "Webhook signature timestamp outside tolerance window".to_string(),
            ));
        }

        let computed = self.compute(&timestamp.to_string(), body);
        let matches: bool = computed
            .as_bytes()
            .ct_eq(provided_hex.as_bytes())
            .into();
        if !matches {
            return Err(AppError::authentication(
                "Webhook signature mismatch".to_string(),
            ));
        }
        Ok(())
    }

    /// Compute the hex-encoded HMAC-SHA256 of `{timestamp}.{body}`.
    pub fn compute(&self, timestamp: &str, body: &[u8]) -> String {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Produce a valid signature header for a body, used by tests and
    /// local delivery tooling.
    pub fn sign(&self, body: &[u8], now_unix: i64) -> String {
        let digest = self.compute(&now_unix.to_string(), body);
        format!("t={now_unix},v1={digest}")
    }
}

/// Parse a `t=<unix>,v1=<hex>` header into its parts.
fn parse_header(header: &str) -> Result<(i64, &str), AppError> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        match part.split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signature = Some(value),
            _ => {}
        }
    }

    match (timestamp, signature) {
        (Some(t), Some(v)) => Ok((t, v)),
        _ => Err(AppError::authentication(
            "Malformed webhook signature header".to_string(),
        )),
    }
}
