//! REST API under `/api`.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: request and response bodies
//!
//! Routes:
//!
//! - `/api/users/*`: register, login, current user, logout
//! - `/api/contacts`: create and search contacts
//! - `/api/contacts/{contact_id}/addresses`: addresses of one contact
//!
//! The OpenAPI document is served at `/api-docs/openapi.json` and rendered at `/docs`.

pub mod handlers;
pub mod models;
