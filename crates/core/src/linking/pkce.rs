//! PKCE (Proof Key for Code Exchange) derivation, RFC 7636
//!
//! The challenge derivation must match the external provider's expectation
//! exactly: `S256` is base64url-no-padding of the SHA-256 digest of the
//! ASCII verifier; `plain` passes the verifier through unchanged.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use linker_domain::constants::{CODE_VERIFIER_BYTES, LINK_TOKEN_BYTES};
use linker_domain::CodeChallengeMethod;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a cryptographically secure code verifier
///
/// Returns a URL-safe base64-encoded random string of 32 bytes
/// (43 characters, within the RFC 7636 43-128 character window).
pub fn generate_code_verifier() -> String {
    random_urlsafe(CODE_VERIFIER_BYTES)
}

/// Generate a linking token
///
/// Same construction as the code verifier: 256 bits from the OS-seeded
/// RNG, URL-safe encoded. Collisions are left to the entropy of the
/// source.
pub fn generate_link_token() -> String {
    random_urlsafe(LINK_TOKEN_BYTES)
}

/// Derive the code challenge for a verifier
///
/// `plain` returns the verifier unchanged; `S256` returns
/// BASE64URL(SHA256(ASCII(verifier))) without padding. Unknown method
/// strings are rejected earlier, when parsing [`CodeChallengeMethod`].
pub fn derive_challenge(verifier: &str, method: CodeChallengeMethod) -> String {
    match method {
        CodeChallengeMethod::Plain => verifier.to_string(),
        CodeChallengeMethod::S256 => {
            let mut hasher = Sha256::new();
            hasher.update(verifier.as_bytes());
            URL_SAFE_NO_PAD.encode(hasher.finalize())
        }
    }
}

fn random_urlsafe(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
