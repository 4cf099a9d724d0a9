use crate::api::PgPool;
use crate::config::PgSettings;
use anyhow::{anyhow, bail, Context, Result};
use deadpool_postgres::Runtime;
use std::time::{Duration, Instant};
use tokio_postgres::NoTls;
use tracing::{debug, warn};

/// Pause between two connection attempts.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Build the connection pool without opening any connection yet.
pub fn pool(settings: &PgSettings) -> Result<PgPool> {
    settings
        .pool_config()
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to build PostgreSQL pool")
}

/// Build the pool and block until PostgreSQL answers a ping, retrying every
/// [`RETRY_INTERVAL`] until `timeout` has elapsed.
pub async fn connect(settings: &PgSettings, timeout: Duration) -> Result<PgPool> {
    let pool = pool(settings)?;
    wait_until_ready(&pool, timeout)
        .await
        .with_context(|| format!("connect to {}:{}", settings.host, settings.port))?;
    Ok(pool)
}

/// Ping the database once per [`RETRY_INTERVAL`] until it answers or `timeout` elapses.
///
/// Every attempt is itself cut off at the time remaining, so an unroutable host still
/// fails within the timeout.
pub async fn wait_until_ready(pool: &PgPool, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let remaining = timeout.saturating_sub(start.elapsed());
        let err = match tokio::time::timeout(remaining, ping(pool)).await {
            Ok(Ok(())) => {
                debug!(
                    "PostgreSQL connection established after {attempt} attempt(s) ({} ms)",
                    start.elapsed().as_millis()
                );
                return Ok(());
            }
            Ok(Err(e)) => e,
            Err(_) => anyhow!("attempt {attempt} did not finish in time"),
        };

        // an attempt after the last pause would have no time left, so this error is the last
        let left = timeout.saturating_sub(start.elapsed());
        if left <= RETRY_INTERVAL {
            tokio::time::sleep(left).await;
            bail!(
                "timed out after {:.1?} waiting for PostgreSQL: {err:#}",
                start.elapsed()
            );
        }

        warn!("PostgreSQL not ready (attempt {attempt}): {err:#}");
        tokio::time::sleep(RETRY_INTERVAL).await;
    }
}

async fn ping(pool: &PgPool) -> Result<()> {
    let client = pool.get().await?;
    client.simple_query("SELECT 1").await?;
    Ok(())
}
