//! Provisioner settings.

use std::time::Duration;

use alloy_primitives::Address;

use crate::account::{BundlerConfig, DEFAULT_ENTRY_POINT};
use crate::config::Config;
use crate::dao::DaoConfig;
use crate::token::{TokenConfig, TokenParams};

/// Everything a run needs besides the request and the collaborators.
#[derive(Debug, Clone)]
pub struct ProvisionerSettings {
    pub chain_id: u64,
    pub bundler_url: String,
    pub entry_point: Address,
    /// Bound on every receipt wait and every DAO step wait.
    pub confirmation_timeout: Duration,
    pub token: TokenParams,
    pub dao: DaoConfig,
}

impl ProvisionerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chain_id: config.chain.chain_id,
            bundler_url: config.bundler.url.clone(),
            entry_point: config.bundler.entry_point,
            confirmation_timeout: config.chain.confirmation_timeout(),
            token: config.token.params(),
            dao: config.dao.clone(),
        }
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    pub fn bundler_config(&self) -> BundlerConfig {
        BundlerConfig {
            url: self.bundler_url.clone(),
            chain_id: self.chain_id,
            entry_point: self.entry_point,
        }
    }
}

impl Default for ProvisionerSettings {
    fn default() -> Self {
        Self {
            chain_id: 31337,
            bundler_url: "http://localhost:4337".to_string(),
            entry_point: DEFAULT_ENTRY_POINT,
            confirmation_timeout: Duration::from_secs(120),
            token: TokenConfig::default().params(),
            dao: DaoConfig::default(),
        }
    }
}
