use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

pub use deadpool_postgres::Pool as PgPool;
pub use reqwest::Client as HttpClient;
pub use tokio_postgres::Client as PgClient;

/// ETL framework.
///
/// The update cycle is split into two halves so that either side can be swapped out on its own:
///
/// 1. `[Http]` - the procedure for fetching data type `T` from some HTTP endpoint.
/// 2. `[Postgres]` - the procedure for inserting the data type `T` into a PostgreSQL database.
///
/// [`Updater`](crate::updater::Updater) composes one of each.
#[async_trait]
pub trait Http<T>: Send + Sync
where
    T: Debug + Send + Sync,
{
    /// How the data type `T` is fetched from some HTTP endpoint.
    async fn fetch(&self) -> Result<T>;
}

/// API to a PostgreSQL database, in which the data `T` will be inserted into; how is the data
/// **loaded**?
#[async_trait]
pub trait Postgres<T>: Send + Sync
where
    T: Debug + Send + Sync,
{
    /// How the data `T` is inserted into the PostgreSQL database.
    async fn insert(&self, data: T) -> Result<()>;
}
