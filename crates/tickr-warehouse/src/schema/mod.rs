pub mod tickers;

use crate::api::PgPool;
use anyhow::{Context, Result};
use tracing::debug;

/// Create the `tickers` table, unless it already exists.
pub static CREATE_QUERY: &str = "
    CREATE TABLE IF NOT EXISTS tickers (
        symbol varchar(20) PRIMARY KEY,
        price_24h float NOT NULL,
        volume_24h float NOT NULL,
        last_trade_price float NOT NULL
    )
";

/// Drop the `tickers` table, if there is one.
pub static DROP_QUERY: &str = "DROP TABLE IF EXISTS tickers";

/// Ensure the `tickers` table exists; a no-op when it already does.
pub async fn create_tables(pool: &PgPool) -> Result<()> {
    let client = pool.get().await.context("create_tables")?;
    client
        .batch_execute(CREATE_QUERY)
        .await
        .context("create_tables")?;
    debug!("tickers table ready");
    Ok(())
}

/// Drop the `tickers` table; a no-op when it is already gone.
pub async fn drop_tables(pool: &PgPool) -> Result<()> {
    let client = pool.get().await.context("drop_tables")?;
    client.batch_execute(DROP_QUERY).await.context("drop_tables")?;
    debug!("tickers table dropped");
    Ok(())
}
