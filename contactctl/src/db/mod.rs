//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! Repositories borrow a `&mut PgConnection`, so they work the same on a pooled connection or
//! inside a transaction:
//!
//! ```ignore
//! use contactctl::db::handlers::{Contacts, Repository};
//!
//! let mut conn = pool.acquire().await?;
//! let mut contacts = Contacts::new(&mut conn);
//! let contact = contacts.get_owned(user_id, contact_id).await?;
//! ```
//!
//! Migrations live in `migrations/` and are embedded via [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;

use std::str::FromStr;

use sqlx::{
    ConnectOptions, PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

use crate::config::Config;

/// Build the main connection pool from configuration.
///
/// Statements slower than `slow_statement_threshold_ms` are logged at warn level.
pub async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let settings = &config.database.pool;

    let options = PgConnectOptions::from_str(&config.database.url)?
        .log_statements(log::LevelFilter::Debug)
        .log_slow_statements(log::LevelFilter::Warn, config.slow_statement_threshold());

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout())
        .idle_timeout(settings.idle_timeout())
        .max_lifetime(settings.max_lifetime())
        .connect_with(options)
        .await?;

    info!(
        max_connections = settings.max_connections,
        "Connected to database"
    );

    Ok(pool)
}
