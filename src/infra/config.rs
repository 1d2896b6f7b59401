//! Centralized configuration (environment variables + defaults).
//!
//! `.env` is honoured through `dotenv`. Unset optional variables fall back to
//! their defaults; set-but-invalid values are errors.

use crate::domain::MissingProductPolicy;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

pub const BIND_ADDR: &str = "SHOP_BIND_ADDR";
pub const STORE: &str = "SHOP_STORE";
pub const DATA_DIR: &str = "SHOP_DATA_DIR";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const MISSING_PRODUCT: &str = "SHOP_MISSING_PRODUCT";
pub const SEED: &str = "SHOP_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Where products are persisted. The cart is always a JSON file under the data dir.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "postgres" | "pg" | "sql" => Ok(Self::Postgres),
            other => Err(format!("unknown store '{}' (expected file|postgres)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub data_dir: PathBuf,
    /// Required when `store` is `Postgres`.
    pub database_url: Option<String>,
    pub missing_product: MissingProductPolicy,
    pub seed_demo: bool,
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store: StoreBackend = parse_or(&lookup, STORE, StoreBackend::File)?;
        let database_url = lookup(DATABASE_URL).filter(|s| !s.trim().is_empty());
        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing(DATABASE_URL));
        }

        let config = Self {
            bind_addr: parse_or(&lookup, BIND_ADDR, SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            store,
            data_dir: lookup(DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            database_url,
            missing_product: parse_or(&lookup, MISSING_PRODUCT, MissingProductPolicy::Reject)?,
            seed_demo: parse_bool(&lookup, SEED)?,
        };
        info!(
            bind_addr = %config.bind_addr,
            store = ?config.store,
            data_dir = %config.data_dir.display(),
            missing_product = %config.missing_product,
            "configuration loaded"
        );
        Ok(config)
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => {
            debug!("{} not set, using default", key);
            Ok(default)
        }
    }
}

fn parse_bool<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                reason: format!("expected a boolean, got '{}'", v),
            }),
        },
    }
}
