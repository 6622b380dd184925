//! Store configuration loaded from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OPTICPOS_DATABASE_URL` (falls back to `DATABASE_URL`) | required |
//! | `OPTICPOS_DB_MAX_CONNECTIONS` | `5` |
//! | `OPTICPOS_DB_ACQUIRE_TIMEOUT_SECS` | `5` |

use anyhow::{Context, anyhow};
use serde::Deserialize;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Connection settings for [`crate::PostgresStore::connect`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_acquire_timeout_secs() -> u64 {
    DEFAULT_ACQUIRE_TIMEOUT_SECS
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("OPTICPOS_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("OPTICPOS_DATABASE_URL or DATABASE_URL must be set"))?;

        let mut config = Self::new(database_url);

        if let Some(raw) = lookup("OPTICPOS_DB_MAX_CONNECTIONS") {
            config.max_connections = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid OPTICPOS_DB_MAX_CONNECTIONS: {raw:?}"))?;
            if config.max_connections == 0 {
                return Err(anyhow!("OPTICPOS_DB_MAX_CONNECTIONS must be at least 1"));
            }
        }

        if let Some(raw) = lookup("OPTICPOS_DB_ACQUIRE_TIMEOUT_SECS") {
            config.acquire_timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid OPTICPOS_DB_ACQUIRE_TIMEOUT_SECS: {raw:?}"))?;
        }

        Ok(config)
    }
}
