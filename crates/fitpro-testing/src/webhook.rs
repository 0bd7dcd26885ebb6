//! Signs webhook payloads the way the payment processor does, so tests can
//! drive the ingress with authentic and tampered deliveries.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Header carrying `t=<unix seconds>,v1=<hex hmac>`.
pub const SIGNATURE_HEADER: &str = "x-payment-signature";

pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret_for_unit_tests_only";

/// Build the signature header value for `payload` signed at `timestamp`.
pub fn sign(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|e| panic!("invalid hmac key: {e}"));
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}
