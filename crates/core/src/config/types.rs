use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::account::DEFAULT_ENTRY_POINT;
use crate::dao::DaoConfig;
use crate::token::TokenConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub chain: ChainConfig,
    pub bundler: BundlerSection,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub dao: DaoConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Chain configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    #[serde(default = "default_backend")]
    pub backend: ChainBackend,
    /// Default RPC endpoint when none is given on the command line
    pub rpc_url: String,
    pub chain_id: u64,
    /// Upper bound on every confirmation wait (default: 120)
    #[serde(default = "default_confirmation_timeout")]
    pub confirmation_timeout_secs: u64,
}

impl ChainConfig {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

fn default_backend() -> ChainBackend {
    ChainBackend::Simulated
}

fn default_confirmation_timeout() -> u64 {
    120
}

/// Available chain backends
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChainBackend {
    /// In-process chain, bundler and DAO backend
    Simulated,
    // Future: JsonRpc
}

/// Bundler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BundlerSection {
    /// Bundler endpoint URL; may carry an API key in its query string
    pub url: String,
    #[serde(default = "default_entry_point")]
    pub entry_point: Address,
}

fn default_entry_point() -> Address {
    DEFAULT_ENTRY_POINT
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("daoforge.db")
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

/// Metrics configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Write the Prometheus text exposition here after each command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textfile_path: Option<PathBuf>,
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub chain: ChainConfig,
    pub bundler: BundlerSection,
    pub token: TokenConfig,
    pub dao: DaoConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// Drops the query string of a URL, where API keys usually live.
pub(crate) fn redact_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{}?<redacted>", base),
        None => url.to_string(),
    }
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            chain: ChainConfig {
                rpc_url: redact_url(&config.chain.rpc_url),
                ..config.chain.clone()
            },
            bundler: BundlerSection {
                url: redact_url(&config.bundler.url),
                entry_point: config.bundler.entry_point,
            },
            token: config.token.clone(),
            dao: config.dao.clone(),
            database: config.database.clone(),
            logging: config.logging.clone(),
            metrics: config.metrics.clone(),
        }
    }
}
