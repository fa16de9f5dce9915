use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::DatabaseConfig;

/// Builds the process-wide pool. Connections are opened on first use, so a
/// database that is down at startup surfaces as per-request failures rather
/// than a startup crash.
pub fn create_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let options = config.connect_options()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.pool_size)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(options);

    tracing::info!(pool_size = config.pool_size, "Database pool created");

    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")
}
