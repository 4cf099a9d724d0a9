use crate::api::*;
use crate::schema::tickers::Tickers;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use dotenv::var;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Public tickers endpoint of the Blockchain.com exchange.
pub const TICKERS_URL: &str = "https://api.blockchain.com/v3/exchange/tickers";

/// Upper bound on a whole request, body included.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Downloads the tickers array from the exchange.
#[derive(Clone, Debug)]
pub struct Fetcher {
    http_client: HttpClient,
    url: String,
}

impl Fetcher {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::ClientBuilder::new()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    /// Use `TICKERS_URL` from the environment, or the exchange endpoint when unset.
    pub fn from_env() -> Result<Self> {
        let url = var("TICKERS_URL").unwrap_or_else(|_| TICKERS_URL.to_string());
        Self::new(url)
    }

    /// One GET, no retries. Anything but `200 OK` is an error naming the request.
    pub async fn download_tickers(&self) -> Result<Tickers> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .context("download_tickers")?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(anyhow!("GET \"{}\": {status}", self.url).context("download_tickers"));
        }

        let body = response.bytes().await.context("download_tickers")?;
        let tickers: Tickers =
            serde_json::from_slice(&body).context("download_tickers: failed decoding tickers")?;

        debug!("{} tickers downloaded from {}", tickers.len(), self.url);
        Ok(tickers)
    }
}

#[async_trait]
impl Http<Tickers> for Fetcher {
    async fn fetch(&self) -> Result<Tickers> {
        self.download_tickers().await
    }
}
