//! Configuration loading and representation.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Process configuration, read from environment variables.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub request_timeout: Duration,
    pub db_max_connections: u32,
}

// DATABASE_URL usually embeds a password.
impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => {
                let raw = raw.strip_prefix(':').unwrap_or(&raw);
                raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                    var: "PORT",
                    reason: e.to_string(),
                })?
            }
        };

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_REQUEST_TIMEOUT,
            Some(raw) => Duration::from_secs(positive("REQUEST_TIMEOUT_SECS", &raw)?),
        };

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            None => DEFAULT_DB_MAX_CONNECTIONS,
            Some(raw) => {
                let n = positive("DB_MAX_CONNECTIONS", &raw)?;
                u32::try_from(n).map_err(|e| ConfigError::Invalid {
                    var: "DB_MAX_CONNECTIONS",
                    reason: e.to_string(),
                })?
            }
        };

        Ok(Self {
            port,
            database_url,
            request_timeout,
            db_max_connections,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn positive(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn missing_database_url() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
        assert_eq!(
            load(&[("DATABASE_URL", "   ")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn defaults() {
        let cfg = load(&[("DATABASE_URL", " postgres://localhost/catalog ")]).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.database_url, "postgres://localhost/catalog");
        assert_eq!(cfg.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(cfg.listen_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn custom_port_with_leading_colon() {
        let cfg = load(&[("DATABASE_URL", "postgres://x"), ("PORT", ":9090")]).unwrap();
        assert_eq!(cfg.port, 9090);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = load(&[("DATABASE_URL", "postgres://x"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

        let err = load(&[("DATABASE_URL", "postgres://x"), ("REQUEST_TIMEOUT_SECS", "0")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "REQUEST_TIMEOUT_SECS", .. }));

        let err = load(&[("DATABASE_URL", "postgres://x"), ("DB_MAX_CONNECTIONS", "-2")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "DB_MAX_CONNECTIONS", .. }));
    }

    #[test]
    fn debug_redacts_database_url() {
        let cfg = load(&[("DATABASE_URL", "postgres://user:secret@db/catalog")]).unwrap();
        assert!(!format!("{cfg:?}").contains("secret"));
    }
}
