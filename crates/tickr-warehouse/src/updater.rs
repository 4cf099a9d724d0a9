use crate::api::*;
use crate::schema::tickers::Tickers;
use crate::shutdown::Shutdown;
use anyhow::{anyhow, bail, Result};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

/// Default period of the background refresh.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(30);

/// Fetch + store, composed.
pub struct Updater<H, P> {
    fetcher: H,
    store: P,
}

impl<H, P> Updater<H, P>
where
    H: Http<Tickers>,
    P: Postgres<Tickers>,
{
    pub fn new(fetcher: H, store: P) -> Self {
        Self { fetcher, store }
    }

    /// Download the tickers and save them; the first error is returned as is.
    pub async fn update_tickers(&self) -> Result<()> {
        let tickers = self.fetcher.fetch().await?;
        self.store.insert(tickers).await?;
        Ok(())
    }

    /// Run [`update_tickers`](Self::update_tickers) every `period` until `shutdown` fires.
    ///
    /// The first cycle starts one `period` from now. Cycles run back to back on this task, so
    /// they never overlap; ticks that come due while a slow cycle is still running are skipped.
    /// A failed cycle is logged and the loop carries on.
    ///
    /// Only a `period` that is zero or too large to schedule is an error.
    pub async fn update_tickers_by_interval(
        &self,
        period: Duration,
        mut shutdown: Shutdown,
    ) -> Result<()> {
        if period.is_zero() {
            bail!("update_tickers_by_interval: period must be non-zero");
        }
        let start = Instant::now()
            .checked_add(period)
            .ok_or_else(|| anyhow!("update_tickers_by_interval: period {period:?} is too large"))?;

        let mut interval = interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    info!("Ticker updates stopped");
                    return Ok(());
                }
                _ = interval.tick() => {}
            }

            match self.update_tickers().await {
                Ok(()) => info!("Tickers updated"),
                Err(e) => error!("Ticker update failed: {e:#}"),
            }
        }
    }
}
