//! Ed25519 verification of inbound webhook signatures.

use ed25519_dalek::{Signature, VerifyingKey};

/// Check that `body` was signed by the platform key over `timestamp || body`.
///
/// Verification must run over the exact raw bytes received. Re-serializing a parsed body is
/// not guaranteed to be byte-identical, so callers hand in the request body untouched and only
/// parse it after a `true` verdict.
///
/// Fails closed: a missing or malformed header, non-hex signature, wrong-length signature, or
/// cryptographic mismatch all yield `false`. This function never panics and never errors.
pub fn verify(
    body: &[u8],
    signature: Option<&str>,
    timestamp: Option<&str>,
    key: &VerifyingKey,
) -> bool {
    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        return false;
    };
    let Ok(signature_bytes) = hex::decode(signature) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(&signature_bytes) else {
        return false;
    };

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);
    key.verify_strict(&message, &signature).is_ok()
}
