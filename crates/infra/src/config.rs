//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{var} must be set when {because} is set")]
    Missing {
        var: &'static str,
        because: &'static str,
    },
}

/// Where sale records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Process-local store; contents are lost on restart.
    InMemory,
    Postgres { url: String, max_connections: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub fetch_timeout: Duration,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or(&get, "BIND_ADDR", || {
            SocketAddr::from(([0, 0, 0, 0], 8080))
        })?;
        let fetch_timeout_secs: u64 =
            parse_or(&get, "SOURCE_FETCH_TIMEOUT_SECS", || DEFAULT_FETCH_TIMEOUT_SECS)?;
        let max_connections: u32 =
            parse_or(&get, "DB_MAX_CONNECTIONS", || DEFAULT_DB_MAX_CONNECTIONS)?;

        let store = match database_url(&get)? {
            Some(url) => StoreConfig::Postgres {
                url,
                max_connections,
            },
            None => StoreConfig::InMemory,
        };

        Ok(Self {
            bind_addr,
            store,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
        })
    }
}

/// `DATABASE_URL` wins; otherwise assemble one from the split variables.
fn database_url<G>(get: &G) -> Result<Option<String>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    if let Some(url) = get("DATABASE_URL") {
        return Ok(Some(url));
    }

    const SPLIT: [&str; 4] = ["POSTGRES_USER", "POSTGRES_PASSWORD", "POSTGRES_DB", "DB_HOST"];
    let Some(trigger) = SPLIT.into_iter().find(|var| get(*var).is_some()) else {
        return Ok(None);
    };

    let require = |var: &'static str| {
        get(var).ok_or(ConfigError::Missing {
            var,
            because: trigger,
        })
    };
    let user = require("POSTGRES_USER")?;
    let password = require("POSTGRES_PASSWORD")?;
    let db = require("POSTGRES_DB")?;
    let host = require("DB_HOST")?;
    let port: u16 = parse_or(get, "DB_PORT", || DEFAULT_DB_PORT)?;

    Ok(Some(format!(
        "postgres://{user}:{password}@{host}:{port}/{db}"
    )))
}

fn parse_or<G, T, D>(get: &G, var: &'static str, default: D) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
    D: FnOnce() -> T,
{
    match get(var) {
        None => Ok(default()),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
