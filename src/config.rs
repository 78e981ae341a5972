//! Process configuration
//!
//! Read from environment variables (after `dotenvy` has loaded any `.env`
//! file). Unset variables take their defaults; set-but-invalid values are
//! errors rather than silently defaulted.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::content::DEFAULT_NARRATIVE_TIMEOUT;
use crate::error::ConfigError;
use crate::page::DEFAULT_RELATED_LIMIT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryConfig {
    pub bind_addr: SocketAddr,
    /// Absolute site root used for canonical URLs
    pub base_url: Url,
    pub database_url: Option<String>,
    pub database_pool_size: u32,
    /// YAML seed for the in-memory store, used when no database is set
    pub seed_path: Option<PathBuf>,
    pub narrative_url: Option<String>,
    pub narrative_timeout: Duration,
    pub related_places_limit: usize,
}

impl DirectoryConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = parse_or(
            "DIRECTORY_BIND_ADDR",
            get("DIRECTORY_BIND_ADDR"),
            DEFAULT_BIND_ADDR,
        )?;

        let base_url_raw =
            get("DIRECTORY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url_raw).map_err(|e| ConfigError::InvalidValue {
            key: "DIRECTORY_BASE_URL",
            value: base_url_raw.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "DIRECTORY_BASE_URL",
                value: base_url_raw,
                reason: "not an absolute base URL".into(),
            });
        }

        let database_pool_size: u32 = parse_or(
            "DATABASE_POOL_SIZE",
            get("DATABASE_POOL_SIZE"),
            &DEFAULT_POOL_SIZE.to_string(),
        )?;

        let timeout_ms: u64 = parse_or(
            "NARRATIVE_TIMEOUT_MS",
            get("NARRATIVE_TIMEOUT_MS"),
            &DEFAULT_NARRATIVE_TIMEOUT.as_millis().to_string(),
        )?;

        let related_places_limit: usize = parse_or(
            "RELATED_PLACES_LIMIT",
            get("RELATED_PLACES_LIMIT"),
            &DEFAULT_RELATED_LIMIT.to_string(),
        )?;

        Ok(Self {
            bind_addr,
            base_url,
            database_url: get("DATABASE_URL"),
            database_pool_size,
            seed_path: get("DIRECTORY_SEED_PATH").map(PathBuf::from),
            narrative_url: get("NARRATIVE_URL"),
            narrative_timeout: Duration::from_millis(timeout_ms),
            related_places_limit,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}

/// Hide the password in a connection string before logging it
pub fn mask_database_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            // set_password only fails for cannot-be-a-base URLs
            let _ = parsed.set_password(Some("****"));
            parsed.to_string()
        }
        Ok(parsed) => parsed.to_string(),
        Err(_) => "<unparseable database url>".to_string(),
    }
}
