pub mod api;
pub mod config;
pub mod db;
pub mod fetch;
pub mod schema;
pub mod shutdown;
pub mod updater;

pub use crate::fetch::Fetcher;
pub use crate::schema::tickers::{Snapshot, TickerRecord, TickerSnapshot, TickerStore, Tickers};
pub use crate::updater::Updater;
