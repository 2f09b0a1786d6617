//! Account provisioner implementation.

use std::sync::Arc;

use tracing::{debug, info};

use super::error::BundlerError;
use super::traits::BundlerConnector;
use super::types::{BundlerConfig, SmartAccount};
use crate::chain::SigningKey;
use crate::config::redact_url;

/// Resolves smart accounts through a bundler service.
#[derive(Clone)]
pub struct AccountProvisioner {
    connector: Arc<dyn BundlerConnector>,
}

impl AccountProvisioner {
    pub fn new(connector: Arc<dyn BundlerConnector>) -> Self {
        Self { connector }
    }

    /// Connects to the bundler, binds the key and chain id, and resolves the account.
    ///
    /// Idempotent: the same key and configuration always resolve the same address.
    pub async fn provision_account(
        &self,
        signing_key: &SigningKey,
        config: &BundlerConfig,
    ) -> Result<SmartAccount, BundlerError> {
        if config.url.trim().is_empty() {
            return Err(BundlerError::InvalidConfig(
                "bundler url is empty".to_string(),
            ));
        }

        debug!(
            connector = self.connector.name(),
            url = %redact_url(&config.url),
            chain_id = config.chain_id,
            "Connecting to bundler"
        );
        let client = self.connector.connect(config).await?;
        let address = client
            .counterfactual_address(signing_key, config.chain_id)
            .await?;

        info!(
            account = %address,
            key = %signing_key,
            chain_id = config.chain_id,
            "Resolved smart account"
        );

        Ok(SmartAccount {
            address,
            signing_key: signing_key.clone(),
            bundler_endpoint: config.url.clone(),
            chain_id: config.chain_id,
        })
    }
}
