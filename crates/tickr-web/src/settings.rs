use anyhow::{Context, Result};
use dotenv::var;

/// Listen address, read from `APP_HOST` / `APP_PORT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl AppSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Unset or empty variables keep their [`Default`] value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("APP_HOST")
            .filter(|host| !host.is_empty())
            .unwrap_or(defaults.host);
        let port = match lookup("APP_PORT").filter(|port| !port.is_empty()) {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("APP_PORT is not a valid port: {port:?}"))?,
            None => defaults.port,
        };

        Ok(Self { host, port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_host_and_port() {
        let settings = AppSettings::from_lookup(|key| match key {
            "APP_HOST" => Some("127.0.0.1".to_string()),
            "APP_PORT" => Some("3000".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(
            settings,
            AppSettings {
                host: "127.0.0.1".to_string(),
                port: 3000
            }
        );
    }

    #[test]
    fn empty_environment_listens_everywhere() {
        let settings = AppSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, AppSettings::default());

        let settings = AppSettings::from_lookup(|key| (key == "APP_HOST").then(String::new)).unwrap();
        assert_eq!(settings.host, "0.0.0.0");
    }

    #[test]
    fn empty_port_falls_back_like_empty_host() {
        let settings = AppSettings::from_lookup(|key| match key {
            "APP_HOST" | "APP_PORT" => Some(String::new()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn rejects_bad_port() {
        let err = AppSettings::from_lookup(|key| (key == "APP_PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(err.to_string().starts_with("APP_PORT is not a valid port"));
    }
}
