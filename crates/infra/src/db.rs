//! Database pool bootstrap.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// How long startup waits for a connection before giving up.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build a pool and verify the database answers before returning it, so the
/// process never starts half-connected.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect(database_url)
        .await?;

    if let Err(e) = ping(&pool).await {
        pool.close().await;
        return Err(e);
    }

    tracing::info!(max_connections, "database pool ready");
    Ok(pool)
}

/// Round-trip a trivial query. Used at startup and by the readiness probe.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
