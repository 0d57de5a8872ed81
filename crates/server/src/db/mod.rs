//! Database operations for the webshop SQLite store.
//!
//! # Tables
//!
//! - `products` - Catalog records
//! - `carts` - One cart header per session token
//! - `cart_items` - Line items, unique per (cart, product)
//! - `admin_credentials` - The admin login row
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are embedded via
//! [`MIGRATOR`]. They run at server startup and via:
//! ```bash
//! cargo run -p webshop-cli -- migrate
//! ```

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod cart;
pub mod credentials;
pub mod products;

pub use cart::CartRepository;
pub use credentials::CredentialRepository;
pub use products::ProductRepository;

/// Embedded database migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created if missing; foreign keys are enforced.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be
/// opened.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Fresh in-memory database with migrations applied, for repository tests.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) async fn test_pool() -> SqlitePool {
    // A single connection so every statement sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}
