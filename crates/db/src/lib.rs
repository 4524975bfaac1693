//! PostgreSQL persistence for the category taxonomy service.
//!
//! [`repositories::PgCategoryStore`] and [`repositories::PgUserStore`]
//! implement the store traits from `taxonomy_core::store`.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

mod error;
pub mod models;
pub mod repositories;

pub use error::map_sqlx_error;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
