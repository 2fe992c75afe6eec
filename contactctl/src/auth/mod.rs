//! Authentication and authorization.
//!
//! Authentication is a single opaque token per user, issued at login and stored on the user row.
//! Clients send it as `Authorization: Bearer <token>` (a bare token is accepted too). The
//! [`CurrentUser`](crate::api::models::users::CurrentUser) extractor resolves it against the
//! database on every request; there is no in-process cache, so logout takes effect immediately.
//!
//! Authorization is ownership only: users own contacts, contacts own addresses. The gates in
//! [`ownership`] enforce that chain and are the sole access-control mechanism.
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for the authenticated user in handlers
//! - [`ownership`]: Contact and address ownership gates
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: Session token generation and header parsing
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use contactctl::api::models::users::CurrentUser;
//!
//! async fn protected_handler(current_user: CurrentUser) -> Result<String, Error> {
//!     Ok(format!("Hello, {}!", current_user.username))
//! }
//! ```

pub mod current_user;
pub mod ownership;
pub mod password;
pub mod session;
