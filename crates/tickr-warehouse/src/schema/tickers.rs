use crate::api::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap as Map;
use tokio_stream::{self as stream, StreamExt};
use tracing::{debug, trace};

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Rows
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// One element of the upstream tickers array.
///
/// ```json
/// {
///     "symbol": "BTC-USD",
///     "price_24h": 67012.5,
///     "volume_24h": 312.77,
///     "last_trade_price": 67430.1
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TickerRecord {
    pub symbol: String,
    pub price_24h: f64,
    pub volume_24h: f64,
    pub last_trade_price: f64,
}

pub type Tickers = Vec<TickerRecord>;

/// The stored values of one symbol, as served by `GET /tickers`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, utoipa::ToSchema)]
pub struct TickerSnapshot {
    pub price: f64,
    pub volume: f64,
    pub last_trade: f64,
}

/// Every stored ticker, keyed (and ordered) by symbol.
pub type Snapshot = Map<String, TickerSnapshot>;

/// Insert a ticker, overwriting the previous values of the same symbol.
pub static UPSERT_QUERY: &str = "
    INSERT INTO tickers (symbol, price_24h, volume_24h, last_trade_price)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (symbol) DO UPDATE
    SET price_24h = excluded.price_24h,
        volume_24h = excluded.volume_24h,
        last_trade_price = excluded.last_trade_price
";

pub static READ_QUERY: &str = "
    SELECT symbol, price_24h, volume_24h, last_trade_price
    FROM tickers
    ORDER BY symbol
";

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Store
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Handle on the `tickers` table; cheap to clone, every clone shares the same pool.
#[derive(Clone)]
pub struct TickerStore {
    pool: PgPool,
}

impl TickerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Upsert every ticker inside one transaction.
    ///
    /// The first failing statement aborts the whole batch: the transaction is rolled back
    /// when it is dropped, so nothing from `tickers` is persisted.
    pub async fn save_tickers(&self, tickers: &[TickerRecord]) -> Result<()> {
        let time = std::time::Instant::now();

        let mut client = self.pool.get().await.context("save_tickers")?;
        let pg_client: &mut PgClient = &mut client;
        let transaction = pg_client.transaction().await.context("save_tickers")?;
        let query = transaction
            .prepare(UPSERT_QUERY)
            .await
            .context("save_tickers: prepare upsert")?;

        let mut stream = stream::iter(tickers);
        while let Some(ticker) = stream.next().await {
            transaction
                .execute(
                    &query,
                    &[
                        &ticker.symbol,
                        &ticker.price_24h,
                        &ticker.volume_24h,
                        &ticker.last_trade_price,
                    ],
                )
                .await
                .with_context(|| format!("save_tickers: upsert {}", ticker.symbol))?;
            trace!("upserted ticker {}", ticker.symbol);
        }

        transaction
            .commit()
            .await
            .context("save_tickers: commit")?;

        debug!(
            "{} tickers saved. Elapsed time: {} ms",
            tickers.len(),
            time.elapsed().as_millis()
        );

        Ok(())
    }

    /// Read the whole table; an empty table is an empty map.
    pub async fn read_tickers(&self) -> Result<Snapshot> {
        let client = self.pool.get().await.context("read_tickers")?;
        let rows = client.query(READ_QUERY, &[]).await.context("read_tickers")?;

        let mut snapshot = Snapshot::new();
        for row in rows {
            let symbol: String = row.try_get("symbol").context("read_tickers")?;
            let ticker = TickerSnapshot {
                price: row.try_get("price_24h").context("read_tickers")?,
                volume: row.try_get("volume_24h").context("read_tickers")?,
                last_trade: row.try_get("last_trade_price").context("read_tickers")?,
            };
            snapshot.insert(symbol, ticker);
        }

        Ok(snapshot)
    }
}

#[async_trait]
impl Postgres<Tickers> for TickerStore {
    async fn insert(&self, data: Tickers) -> Result<()> {
        self.save_tickers(&data).await
    }
}
