//! Shared Postgres pool
//!
//! One pool is built at startup and handed to [`super::SessionProvider`];
//! nothing here is global.

use std::str::FromStr;

use log::LevelFilter;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgConnection, PgPool};

use crate::config::DbConfig;
use crate::Result;

/// Create a pool from config.
///
/// With `echo` set every statement is logged at info level, otherwise at
/// debug.
///
/// # Errors
///
/// Returns an error if the URL does not parse or the first connection fails.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool> {
    let statement_level = if config.echo {
        LevelFilter::Info
    } else {
        LevelFilter::Debug
    };

    let options = PgConnectOptions::from_str(&config.database_url)?
        .log_statements(statement_level);

    tracing::info!(
        url = %config.redacted_url(),
        max_connections = config.max_connections,
        "Connecting to database"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create a pool from a bare connection string with default settings.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    create_pool(&DbConfig::new(database_url)).await
}

/// Round-trip a trivial query on an acquired connection.
pub async fn ping(conn: &mut PgConnection) -> Result<i32> {
    let one = sqlx::query_scalar("SELECT 1").fetch_one(conn).await?;
    Ok(one)
}
