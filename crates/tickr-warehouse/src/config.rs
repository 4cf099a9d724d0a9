use anyhow::{anyhow, bail, Context, Result};
use deadpool_postgres::{Config, ManagerConfig, RecyclingMethod, SslMode};
use dotenv::var;

/// PostgreSQL connection parameters, read from the `POSTGRES_*` environment variables.
#[derive(Clone)]
pub struct PgSettings {
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub ssl_mode: SslMode,
}

impl PgSettings {
    /// Read the settings from the environment (a `.env` file is loaded first, if present).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Build the settings from any key -> value source.
    ///
    /// `POSTGRES_PORT` falls back to 5432 and `POSTGRES_SSLMODE` to `prefer`; everything
    /// else is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{key} must be set"));

        let port = match lookup("POSTGRES_PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("POSTGRES_PORT is not a valid port: {port:?}"))?,
            None => 5432,
        };

        let ssl_mode = match lookup("POSTGRES_SSLMODE") {
            Some(mode) => parse_ssl_mode(&mode)?,
            None => SslMode::Prefer,
        };

        Ok(Self {
            dbname: required("POSTGRES_DB")?,
            user: required("POSTGRES_USER")?,
            password: required("POSTGRES_PASSWORD")?,
            host: required("POSTGRES_HOST")?,
            port,
            ssl_mode,
        })
    }

    /// Translate the settings into a pool configuration.
    pub fn pool_config(&self) -> Config {
        let mut cfg = Config::new();
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.ssl_mode = Some(self.ssl_mode);
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg
    }
}

// libpq accepts six modes; the driver only distinguishes three.
fn parse_ssl_mode(mode: &str) -> Result<SslMode> {
    let mode = match mode.trim().to_lowercase().as_str() {
        "disable" => SslMode::Disable,
        "allow" | "prefer" => SslMode::Prefer,
        "require" | "verify-ca" | "verify-full" => SslMode::Require,
        other => bail!("POSTGRES_SSLMODE has an unknown value: {other:?}"),
    };
    Ok(mode)
}
