//! Configuration loading and representation.
//!
//! Everything comes from environment variables. A `.env` file, when present,
//! is loaded into the environment by the binary before `AppConfig::from_env`
//! runs.
//!
//! | Variable | Default |
//! |---|---|
//! | `APP_HOST` | `0.0.0.0` |
//! | `APP_PORT` | `8080` |
//! | `LOG_FORMAT` | `json` |
//! | `USE_PERSISTENT_STORES` | `false` |
//! | `DATABASE_URL` | built from `DATABASE__*` parts |
//! | `DATABASE__SERVER`, `DATABASE__NAME`, `DATABASE__USER`, `DATABASE__PASSWORD` | none |
//! | `DATABASE__PORT` | `5432` |
//! | `DATABASE__MAX_CONNECTIONS` | `5` |

use core::str::FromStr;

use staffhub_observability::LogFormat;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Postgres connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

// The URL carries the password; keep it out of logs.
impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub use_persistent_stores: bool,
    /// Always `Some` when `use_persistent_stores` is set.
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("APP_PORT", get("APP_PORT"), DEFAULT_PORT)?;
        let log_format = match get("LOG_FORMAT") {
            Some(raw) => LogFormat::from_str(&raw).map_err(|e| ConfigError::Invalid {
                key: "LOG_FORMAT",
                value: raw,
                reason: e.to_string(),
            })?,
            None => LogFormat::default(),
        };
        let use_persistent_stores =
            parse_or("USE_PERSISTENT_STORES", get("USE_PERSISTENT_STORES"), false)?;

        let database = match database_url(&get)? {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(
                    "DATABASE__MAX_CONNECTIONS",
                    get("DATABASE__MAX_CONNECTIONS"),
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            }),
            None if use_persistent_stores => return Err(ConfigError::Missing("DATABASE_URL")),
            None => None,
        };

        Ok(Self {
            host,
            port,
            log_format,
            use_persistent_stores,
            database,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

/// `DATABASE_URL` wins; otherwise assemble one from the `DATABASE__*` parts.
/// Returns `None` when neither is configured.
fn database_url(get: &impl Fn(&str) -> Option<String>) -> Result<Option<String>, ConfigError> {
    if let Some(url) = get("DATABASE_URL") {
        return Ok(Some(url));
    }

    let Some(server) = get("DATABASE__SERVER") else {
        return Ok(None);
    };
    let name = get("DATABASE__NAME").ok_or(ConfigError::Missing("DATABASE__NAME"))?;
    let user = get("DATABASE__USER").ok_or(ConfigError::Missing("DATABASE__USER"))?;
    let port = parse_or("DATABASE__PORT", get("DATABASE__PORT"), DEFAULT_DB_PORT)?;

    let credentials = match get("DATABASE__PASSWORD") {
        Some(password) => format!("{user}:{password}"),
        None => user,
    };

    Ok(Some(format!(
        "postgres://{credentials}@{server}:{port}/{name}"
    )))
}
