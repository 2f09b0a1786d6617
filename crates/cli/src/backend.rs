//! Collaborator wiring per chain backend.

use std::sync::Arc;

use tracing::warn;

use daoforge_core::account::BundlerConnector;
use daoforge_core::chain::ChainConnector;
use daoforge_core::config::{ChainBackend, ChainConfig};
use daoforge_core::dao::DaoClient;
use daoforge_core::testing::{MockBundler, MockChain, MockDaoClient};

/// The external services a provisioning run talks to.
pub struct Backend {
    pub bundler: Arc<dyn BundlerConnector>,
    pub chain: Arc<dyn ChainConnector>,
    pub dao_client: Arc<dyn DaoClient>,
}

impl Backend {
    pub fn from_config(config: &ChainConfig) -> Self {
        match config.backend {
            ChainBackend::Simulated => {
                warn!(
                    chain_id = config.chain_id,
                    "Using the simulated backend, nothing is submitted to a real network"
                );
                Self {
                    bundler: Arc::new(MockBundler::new()),
                    chain: Arc::new(MockChain::new()),
                    dao_client: Arc::new(MockDaoClient::new()),
                }
            }
        }
    }
}
