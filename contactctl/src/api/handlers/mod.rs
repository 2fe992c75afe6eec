//! HTTP request handlers, one module per resource.
//!
//! Handlers authenticate through the [`CurrentUser`](crate::api::models::users::CurrentUser)
//! extractor, validate through [`crate::validation`], gate contacts and addresses through
//! [`crate::auth::ownership`], and wrap every success in a
//! [`WebResponse`](crate::api::models::responses::WebResponse).
//!
//! - [`users`]: registration, login, the current user, logout
//! - [`contacts`]: contact CRUD and search
//! - [`addresses`]: address CRUD under a contact

pub mod addresses;
pub mod contacts;
pub mod users;
