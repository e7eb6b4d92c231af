//! Database layer with `SeaORM` entities and the PostgreSQL store.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - [`PgStore`], the PostgreSQL implementation of `ErpStore`
//! - Database migrations

mod convert;
pub mod entities;
pub mod migration;
pub mod store;

pub use store::PgStore;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool of at most `max_connections`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(max_connections).sqlx_logging(false);
    Database::connect(options).await
}
