//! Opaque session tokens.
//!
//! A token is 32 random bytes, base64url-encoded, stored verbatim on the user row. Logging in
//! replaces it and logging out clears it, so at most one token per user is ever valid.

use base64::{Engine as _, engine::general_purpose};
use rand::prelude::RngExt;
use rand::rng;

/// Generate a fresh session token.
pub fn generate_session_token() -> String {
    // 32 bytes (256 bits) of cryptographically secure random data
    let mut token_bytes = [0u8; 32];
    rng().fill(&mut token_bytes);

    // Encode as base64url without padding
    general_purpose::URL_SAFE_NO_PAD.encode(token_bytes)
}

/// Pull the token out of an `Authorization` header value.
///
/// Accepts `Bearer <token>` as well as a bare token. Returns `None` for a blank value.
pub fn token_from_header(value: &str) -> Option<&str> {
    let value = value.trim();
    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => value,
    };

    (!token.is_empty()).then_some(token)
}
