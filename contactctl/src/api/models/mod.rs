//! API request and response data models.
//!
//! API models are distinct from database models, so storage columns never reach a response by
//! accident. Request models derive [`validator::Validate`] and are extracted through
//! [`crate::validation`]; every model is annotated with `utoipa` for the OpenAPI document.
//!
//! - [`users`]: Registration, login and profile payloads
//! - [`contacts`]: Contact payloads and search parameters
//! - [`addresses`]: Address payloads
//! - [`responses`]: The `{message, data, paging?}` envelope
//! - [`pagination`]: Page-number pagination

pub mod addresses;
pub mod contacts;
pub mod pagination;
pub mod responses;
pub mod users;
