//! Error types for the place directory
//!
//! Request-path code never surfaces these to a page: the resolver folds
//! store failures into `NotFound`, the synthesizer folds narrative failures
//! into fallback content, and the gate has no failure mode at all. The
//! aggregate [`DirectoryError`] is for setup code (config, store
//! construction, server startup).

use std::time::Duration;

use thiserror::Error;

/// Top-level error for wiring and startup
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Narrative error: {0}")]
    Narrative(#[from] NarrativeError),

    #[error("Location path error: {0}")]
    LocationPath(#[from] LocationPathError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by `EntityStore` implementations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid seed data: {0}")]
    Seed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        StoreError::Database(error.to_string())
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(error: serde_yaml::Error) -> Self {
        StoreError::Seed(error.to_string())
    }
}

/// Errors raised by a `NarrativeGenerator`
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Narrative generation is disabled")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generator returned status {0}")]
    Status(u16),

    #[error("Could not decode generator response: {0}")]
    Decode(String),

    #[error("Generator timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors constructing a `LocationPath`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationPathError {
    #[error("Empty {0} slug")]
    EmptySlug(&'static str),

    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),
}

/// Invalid environment configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
