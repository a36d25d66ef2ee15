//! Process configuration from environment variables.
//!
//! An optional `.env` file in the working directory is loaded first.
//! Variables already set in the environment win over the file.

use std::env::VarError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::onemap::{DEFAULT_BASE_URL, OneMapConfig};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Error reading a configuration variable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{0} value is not valid unicode")]
    NotUnicode(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Load `.env` if present. Safe to call more than once.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }
}

/// Connection settings for the parking database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Read `POSTGRES_*` and `DB_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(lookup: &Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: required(lookup, "POSTGRES_HOST")?,
            port: parsed_or(lookup, "POSTGRES_PORT", 5432)?,
            database: required(lookup, "POSTGRES_DATABASE")?,
            user: required(lookup, "POSTGRES_USER")?,
            password: required(lookup, "POSTGRES_PASSWORD")?,
            min_connections: parsed_or(lookup, "DB_MIN_CONNECTIONS", 2)?,
            max_connections: parsed_or(lookup, "DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parsed_or(lookup, "DB_ACQUIRE_TIMEOUT_SECS", 10)?),
        })
    }

    /// sqlx connection options for this database.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Where the server finds parking spots.
#[derive(Debug, Clone)]
pub enum ParkingSource {
    /// PostGIS table, the normal deployment
    Database(DatabaseConfig),

    /// NDJSON feed records held in memory, for running without a database
    File(PathBuf),
}

/// Configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub onemap: OneMapConfig,
    pub parking: ParkingSource,
}

impl AppConfig {
    /// Read the service configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(lookup: &Lookup<'_>) -> Result<Self, ConfigError> {
        let listen_addr = parsed_or(
            lookup,
            "LISTEN_ADDR",
            SocketAddr::from_str(DEFAULT_LISTEN_ADDR).map_err(|e| ConfigError::Invalid {
                name: "LISTEN_ADDR",
                value: DEFAULT_LISTEN_ADDR.to_string(),
                reason: e.to_string(),
            })?,
        )?;

        let base_url =
            optional(lookup, "ONEMAP_BASE_URL")?.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let onemap = OneMapConfig::new(
            required(lookup, "ONEMAP_EMAIL")?,
            required(lookup, "ONEMAP_PASSWORD")?,
        )
        .with_base_url(base_url);
        let max_concurrent = parsed_or(lookup, "ONEMAP_MAX_CONCURRENT", onemap.max_concurrent)?;
        if max_concurrent == 0 {
            return Err(ConfigError::Invalid {
                name: "ONEMAP_MAX_CONCURRENT",
                value: max_concurrent.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let onemap = onemap.with_max_concurrent(max_concurrent);

        // A feed file replaces the database entirely
        let parking = match optional(lookup, "PARKING_NDJSON")? {
            Some(path) => ParkingSource::File(PathBuf::from(path)),
            None => ParkingSource::Database(DatabaseConfig::from_lookup(lookup)?),
        };

        Ok(Self {
            listen_addr,
            onemap,
            parking,
        })
    }
}

/// The DataMall account key, needed only to fetch parking records.
pub fn datamall_account_key() -> Result<String, ConfigError> {
    required(&env_lookup, "DATAMALL_ACCOUNT_KEY")
}

type Lookup<'a> = dyn Fn(&str) -> Result<String, VarError> + 'a;

fn env_lookup(name: &str) -> Result<String, VarError> {
    std::env::var(name)
}

fn optional(lookup: &Lookup<'_>, name: &'static str) -> Result<Option<String>, ConfigError> {
    match lookup(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(name)),
    }
}

fn required(lookup: &Lookup<'_>, name: &'static str) -> Result<String, ConfigError> {
    optional(lookup, name)?.ok_or(ConfigError::Missing(name))
}

fn parsed_or<T>(lookup: &Lookup<'_>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(lookup, name)? {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value,
            reason: e.to_string(),
        }),
    }
}
