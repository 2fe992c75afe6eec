//! Common type definitions.
//!
//! All entity IDs are `BIGSERIAL` keys wrapped in type aliases so signatures say which table an
//! id belongs to:
//!
//! - [`UserId`]: User account identifier
//! - [`ContactId`]: Contact identifier
//! - [`AddressId`]: Address identifier

// Type aliases for IDs
pub type UserId = i64;
pub type ContactId = i64;
pub type AddressId = i64;

/// Abbreviate a session token to its first 8 characters so it can appear in logs and traces
/// without exposing a usable credential.
pub fn abbrev_token(token: &str) -> String {
    token.chars().take(8).collect()
}
