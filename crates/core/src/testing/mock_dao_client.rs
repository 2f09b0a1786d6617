//! Mock DAO client for testing.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{keccak256, Address, TxHash};
use async_trait::async_trait;
use futures::{stream, StreamExt};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::{
    DaoClient, DaoClientError, DaoCreationParams, DaoCreationStep, DaoMetadata, DaoStepStream,
};

/// One scripted item of a creation stream.
#[derive(Debug, Clone)]
pub enum ScriptedStep {
    /// Yield this step.
    Step(DaoCreationStep),
    /// Yield this error.
    Fail(DaoClientError),
    /// Pause before the next item.
    Delay(Duration),
}

#[derive(Debug, Default)]
struct MockDaoClientState {
    script: Option<Vec<ScriptedStep>>,
    creations: Vec<DaoCreationParams>,
    pinned: Vec<DaoMetadata>,
    pinning_failure: bool,
}

/// Mock implementation of [`DaoClient`].
///
/// Without a script, every creation yields one `Creating` step and a `Done`
/// step with freshly generated addresses, so two creations never return the
/// same DAO. Creations are recorded when their stream is first polled.
#[derive(Debug, Clone, Default)]
pub struct MockDaoClient {
    state: Arc<RwLock<MockDaoClientState>>,
}

impl MockDaoClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay this script for every subsequent creation.
    pub async fn set_script(&self, script: Vec<ScriptedStep>) {
        self.state.write().await.script = Some(script);
    }

    /// Make metadata pinning fail.
    pub async fn set_pinning_failure(&self, fail: bool) {
        self.state.write().await.pinning_failure = fail;
    }

    /// Parameters of every creation that was started.
    pub async fn recorded_creations(&self) -> Vec<DaoCreationParams> {
        self.state.read().await.creations.clone()
    }

    /// Every metadata document that was pinned.
    pub async fn pinned_metadata(&self) -> Vec<DaoMetadata> {
        self.state.read().await.pinned.clone()
    }

    /// Script used when none was set.
    pub fn default_script() -> Vec<ScriptedStep> {
        vec![
            ScriptedStep::Step(DaoCreationStep::Creating {
                tx_hash: random_word(),
            }),
            ScriptedStep::Step(DaoCreationStep::Done {
                dao_address: Address::from_word(random_word()),
                plugin_addresses: vec![Address::from_word(random_word())],
            }),
        ]
    }
}

fn random_word() -> TxHash {
    keccak256(Uuid::new_v4().as_bytes())
}

#[async_trait]
impl DaoClient for MockDaoClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn pin_metadata(&self, metadata: &DaoMetadata) -> Result<String, DaoClientError> {
        let mut state = self.state.write().await;
        if state.pinning_failure {
            return Err(DaoClientError::Pinning("pinning service unavailable".to_string()));
        }
        state.pinned.push(metadata.clone());

        let document =
            serde_json::to_vec(metadata).map_err(|e| DaoClientError::Pinning(e.to_string()))?;
        Ok(format!("ipfs://{:x}", Sha256::digest(&document)))
    }

    fn create_dao(&self, params: DaoCreationParams) -> DaoStepStream {
        let state = Arc::clone(&self.state);

        stream::once(async move {
            let mut state = state.write().await;
            state.creations.push(params);
            let script = state.script.clone().unwrap_or_else(Self::default_script);
            stream::iter(script)
        })
        .flatten()
        .filter_map(|item| async move {
            match item {
                ScriptedStep::Step(step) => Some(Ok(step)),
                ScriptedStep::Fail(error) => Some(Err(error)),
                ScriptedStep::Delay(delay) => {
                    tokio::time::sleep(delay).await;
                    None
                }
            }
        })
        .boxed()
    }
}
