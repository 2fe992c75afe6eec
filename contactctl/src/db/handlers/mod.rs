//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed CRUD operations via [`Repository`]
//! - Returns domain models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Users`]: User accounts and session tokens
//! - [`Contacts`]: Contacts, including the paginated search query
//! - [`Addresses`]: Addresses nested under a contact
//!
//! ```ignore
//! use contactctl::db::handlers::{Users, Repository};
//!
//! let mut conn = pool.acquire().await?;
//! let mut repo = Users::new(&mut conn);
//! let user = repo.get_by_username("khannedy").await?;
//! ```

pub mod addresses;
pub mod contacts;
pub mod repository;
pub mod users;

pub use addresses::Addresses;
pub use contacts::Contacts;
pub use repository::Repository;
pub use users::Users;
