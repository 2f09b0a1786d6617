//! Trait definitions for the account module.

use alloy_primitives::Address;
use async_trait::async_trait;

use super::error::BundlerError;
use super::types::BundlerConfig;
use crate::chain::SigningKey;

/// A connected bundler client.
#[async_trait]
pub trait BundlerClient: Send + Sync {
    /// Resolves the counterfactual account address owned by `signer` on `chain_id`.
    ///
    /// Must not have on-chain side effects.
    async fn counterfactual_address(
        &self,
        signer: &SigningKey,
        chain_id: u64,
    ) -> Result<Address, BundlerError>;
}

/// Builds bundler clients from configuration.
#[async_trait]
pub trait BundlerConnector: Send + Sync {
    /// Returns the name of this connector implementation.
    fn name(&self) -> &str;

    /// Opens a client for the bundler described by `config`.
    async fn connect(&self, config: &BundlerConfig) -> Result<Box<dyn BundlerClient>, BundlerError>;
}
