//! Mock bundler for testing.

use std::sync::Arc;

use alloy_primitives::{keccak256, Address};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::{BundlerClient, BundlerConfig, BundlerConnector, BundlerError};
use crate::chain::SigningKey;

#[derive(Debug, Default)]
struct MockBundlerState {
    connections: Vec<BundlerConfig>,
    unreachable: bool,
    next_error: Option<BundlerError>,
}

/// Mock implementation of [`BundlerConnector`].
///
/// Addresses are derived by hashing the key, chain id and entry point, so the
/// same inputs always resolve to the same account.
///
/// ```rust,ignore
/// let bundler = MockBundler::new();
/// let provisioner = AccountProvisioner::new(Arc::new(bundler.clone()));
///
/// bundler.set_unreachable(true).await;
/// assert!(provisioner.provision_account(&key, &config).await.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBundler {
    state: Arc<RwLock<MockBundlerState>>,
}

impl MockBundler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every connection attempt fail with [`BundlerError::Unreachable`].
    pub async fn set_unreachable(&self, unreachable: bool) {
        self.state.write().await.unreachable = unreachable;
    }

    /// Fail the next address resolution with this error.
    pub async fn set_next_error(&self, error: BundlerError) {
        self.state.write().await.next_error = Some(error);
    }

    /// Number of successful connections.
    pub async fn connect_count(&self) -> usize {
        self.state.read().await.connections.len()
    }

    /// Configurations of successful connections, in order.
    pub async fn connections(&self) -> Vec<BundlerConfig> {
        self.state.read().await.connections.clone()
    }

    /// The address this mock derives for `signer` under `config`.
    pub fn derive_address(signer: &SigningKey, config: &BundlerConfig) -> Address {
        let mut preimage = Vec::new();
        preimage.extend_from_slice(signer.expose().as_bytes());
        preimage.extend_from_slice(&config.chain_id.to_be_bytes());
        preimage.extend_from_slice(config.entry_point.as_slice());
        Address::from_word(keccak256(preimage))
    }
}

#[async_trait]
impl BundlerConnector for MockBundler {
    fn name(&self) -> &str {
        "mock"
    }

    async fn connect(&self, config: &BundlerConfig) -> Result<Box<dyn BundlerClient>, BundlerError> {
        let mut state = self.state.write().await;
        if state.unreachable {
            return Err(BundlerError::Unreachable {
                url: config.url.clone(),
                reason: "connection refused".to_string(),
            });
        }
        state.connections.push(config.clone());

        Ok(Box::new(MockBundlerClient {
            config: config.clone(),
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockBundlerClient {
    config: BundlerConfig,
    state: Arc<RwLock<MockBundlerState>>,
}

#[async_trait]
impl BundlerClient for MockBundlerClient {
    async fn counterfactual_address(
        &self,
        signer: &SigningKey,
        chain_id: u64,
    ) -> Result<Address, BundlerError> {
        if let Some(error) = self.state.write().await.next_error.take() {
            return Err(error);
        }
        let config = BundlerConfig {
            chain_id,
            ..self.config.clone()
        };
        Ok(MockBundler::derive_address(signer, &config))
    }
}
