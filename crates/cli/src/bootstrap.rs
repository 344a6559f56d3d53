use junction_dns_infrastructure::{create_pool, init_schema};
use sqlx::SqlitePool;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("junction_dns={0},junction_dns_application={0},junction_dns_infrastructure={0},junction_dns_api={0}", level)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn init_database(database_url: &str) -> anyhow::Result<SqlitePool> {
    info!(url = %database_url, "initializing route database");
    let pool = create_pool(database_url).await?;
    init_schema(&pool).await?;
    Ok(pool)
}
