//! PKCE (Proof Key for Code Exchange) helpers
//!
//! RFC 7636: https://tools.ietf.org/html/rfc7636

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::debug;

fn random_segment(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a random code verifier
///
/// Shape is `{12}-_{4}-{32}` over `[0-9A-Za-z]`, 51 characters in total,
/// which sits inside the 43-128 range RFC 7636 allows.
pub fn generate_code_verifier() -> String {
    let verifier = format!(
        "{}-_{}-{}",
        random_segment(12),
        random_segment(4),
        random_segment(32)
    );

    debug!("PKCE verifier generated: {} chars", verifier.len());
    verifier
}

/// code_challenge = BASE64URL(SHA256(code_verifier)), unpadded
pub fn derive_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}
