//! Database record models matching table schemas.
//!
//! Each table gets a create request, an update request and a response struct. Database models
//! are distinct from API models so storage columns (password hashes, tokens, timestamps) never
//! leak into responses by accident; API models convert from these via `From`.
//!
//! - [`users`]: User accounts and their session token
//! - [`contacts`]: Contacts owned by a user
//! - [`addresses`]: Addresses belonging to a contact

pub mod addresses;
pub mod contacts;
pub mod users;
