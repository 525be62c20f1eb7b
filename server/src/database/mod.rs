use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

pub mod password;
pub mod users;

/// Open the credential store and size its connection pool.
///
/// `url` is a SQLite path or URL (`"dashboard.db"`, `"sqlite::memory:"`).
/// The file is created on first run.
pub async fn connect(url: &str, pool_size: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .context("Invalid database URL")?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(pool_size)
        .connect_with(options)
        .await
        .context("Failed to open database")?;

    info!("Database connected: {}", url);

    Ok(pool)
}

/// Create the users table if it does not exist yet.
///
/// Email uniqueness is enforced here by the UNIQUE index as well as by the
/// pre-insert check in the register handler; the index is what makes the
/// invariant hold under concurrent registrations.
pub async fn init_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT    NOT NULL,
            email         TEXT    NOT NULL UNIQUE,
            password_hash TEXT    NOT NULL,
            created_at    INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = connect("sqlite::memory:", 1).await.unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
