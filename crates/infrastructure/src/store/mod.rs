pub mod codec;
pub mod sqlite;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Idempotent schema setup. One KV-style table: canonical domain key to
/// compact policy record.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS routes (
             domain TEXT PRIMARY KEY,
             policy BLOB NOT NULL
         )",
    )
    .execute(pool)
    .await?;
    Ok(())
}
