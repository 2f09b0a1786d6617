//! Mock chain for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{keccak256, Address, TxHash};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::chain::{
    AbiValue, ChainClient, ChainConnector, ChainError, ContractCall, DeployRequest,
    ReceiptStatus, SigningKey, TransactionReceipt,
};
use crate::token::TokenCall;

/// A transaction the mock accepted, for test assertions.
#[derive(Debug, Clone)]
pub enum RecordedTransaction {
    Deploy {
        tx_hash: TxHash,
        signer: String,
        request: DeployRequest,
    },
    Call {
        tx_hash: TxHash,
        signer: String,
        call: ContractCall,
    },
}

impl RecordedTransaction {
    pub fn tx_hash(&self) -> TxHash {
        match self {
            Self::Deploy { tx_hash, .. } | Self::Call { tx_hash, .. } => *tx_hash,
        }
    }
}

/// State change applied once a successful transaction is confirmed.
#[derive(Debug, Clone)]
enum Effect {
    Deploy(Address),
    TransferOwnership { token: Address, new_owner: Address },
    None,
}

#[derive(Debug, Clone)]
struct Submitted {
    status: ReceiptStatus,
    effect: Effect,
}

#[derive(Debug, Default)]
struct MockChainState {
    recorded: Vec<RecordedTransaction>,
    submitted: HashMap<TxHash, Submitted>,
    confirmed_contracts: HashSet<Address>,
    owners: HashMap<Address, Address>,
    connections: Vec<(String, u64)>,
    nonce: u64,
    block_number: u64,
    next_error: Option<ChainError>,
    revert_next_deploy: bool,
    revert_next_call: bool,
    receipt_delay: Duration,
    unreachable: bool,
}

impl MockChainState {
    fn next_hash(&mut self, signer: &SigningKey) -> TxHash {
        self.nonce += 1;
        let mut preimage = signer.fingerprint().into_bytes();
        preimage.extend_from_slice(&self.nonce.to_be_bytes());
        keccak256(preimage)
    }
}

/// Mock implementation of [`ChainClient`] and [`ChainConnector`].
///
/// Models inclusion: a deployed contract only becomes callable once its
/// deployment receipt has been awaited, and ownership only changes once the
/// transfer receipt has been awaited.
///
/// ```rust,ignore
/// let chain = MockChain::new();
/// chain.set_revert_next_call(true).await;
///
/// let err = deployer.deploy_token(&chain, &key, owner, &params).await.unwrap_err();
/// assert!(err.orphaned_token().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    state: Arc<RwLock<MockChainState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next submission with this error; the transaction is not recorded.
    pub async fn set_next_error(&self, error: ChainError) {
        self.state.write().await.next_error = Some(error);
    }

    /// Let the next deployment be included with a reverted status.
    pub async fn set_revert_next_deploy(&self, revert: bool) {
        self.state.write().await.revert_next_deploy = revert;
    }

    /// Let the next contract call be included with a reverted status.
    pub async fn set_revert_next_call(&self, revert: bool) {
        self.state.write().await.revert_next_call = revert;
    }

    /// Delay every receipt by this much.
    pub async fn set_receipt_delay(&self, delay: Duration) {
        self.state.write().await.receipt_delay = delay;
    }

    /// Make [`ChainConnector::connect`] fail.
    pub async fn set_unreachable(&self, unreachable: bool) {
        self.state.write().await.unreachable = unreachable;
    }

    /// All accepted transactions, in submission order.
    pub async fn recorded_transactions(&self) -> Vec<RecordedTransaction> {
        self.state.read().await.recorded.clone()
    }

    /// `(rpc_url, chain_id)` of every successful connection.
    pub async fn connections(&self) -> Vec<(String, u64)> {
        self.state.read().await.connections.clone()
    }

    /// Address a submitted deployment will create, before it is confirmed.
    pub async fn pending_contract_address(&self, tx_hash: TxHash) -> Option<Address> {
        match self.state.read().await.submitted.get(&tx_hash)?.effect {
            Effect::Deploy(address) => Some(address),
            _ => None,
        }
    }

    /// Confirmed owner of a contract, if ownership was ever transferred.
    pub async fn owner_of(&self, contract: Address) -> Option<Address> {
        self.state.read().await.owners.get(&contract).copied()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn name(&self) -> &str {
        "mock"
    }

    async fn deploy_contract(
        &self,
        signer: &SigningKey,
        request: DeployRequest,
    ) -> Result<TxHash, ChainError> {
        let mut state = self.state.write().await;
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        let tx_hash = state.next_hash(signer);
        let status = if std::mem::take(&mut state.revert_next_deploy) {
            ReceiptStatus::Reverted
        } else {
            ReceiptStatus::Success
        };
        let effect = match status {
            ReceiptStatus::Success => Effect::Deploy(Address::from_word(keccak256(tx_hash))),
            ReceiptStatus::Reverted => Effect::None,
        };

        state.submitted.insert(tx_hash, Submitted { status, effect });
        state.recorded.push(RecordedTransaction::Deploy {
            tx_hash,
            signer: signer.fingerprint(),
            request,
        });
        Ok(tx_hash)
    }

    async fn send_transaction(
        &self,
        signer: &SigningKey,
        call: ContractCall,
    ) -> Result<TxHash, ChainError> {
        let mut state = self.state.write().await;
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if !state.confirmed_contracts.contains(&call.to) {
            return Err(ChainError::UnknownContract(call.to));
        }

        let tx_hash = state.next_hash(signer);
        let status = if std::mem::take(&mut state.revert_next_call) {
            ReceiptStatus::Reverted
        } else {
            ReceiptStatus::Success
        };
        let effect = match (call.signature, call.args.as_slice()) {
            (TokenCall::TRANSFER_OWNERSHIP, [AbiValue::Address(new_owner)]) => {
                Effect::TransferOwnership {
                    token: call.to,
                    new_owner: *new_owner,
                }
            }
            _ => Effect::None,
        };

        state.submitted.insert(tx_hash, Submitted { status, effect });
        state.recorded.push(RecordedTransaction::Call {
            tx_hash,
            signer: signer.fingerprint(),
            call,
        });
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, ChainError> {
        let delay = self.state.read().await.receipt_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().await;
        let submitted = state
            .submitted
            .get(&tx_hash)
            .cloned()
            .ok_or(ChainError::UnknownTransaction(tx_hash))?;

        state.block_number += 1;
        let mut contract_address = None;
        if submitted.status == ReceiptStatus::Success {
            match submitted.effect {
                Effect::Deploy(address) => {
                    state.confirmed_contracts.insert(address);
                    contract_address = Some(address);
                }
                Effect::TransferOwnership { token, new_owner } => {
                    state.owners.insert(token, new_owner);
                }
                Effect::None => {}
            }
        }

        Ok(TransactionReceipt {
            tx_hash,
            status: submitted.status,
            contract_address,
            block_number: state.block_number,
        })
    }
}

#[async_trait]
impl ChainConnector for MockChain {
    async fn connect(
        &self,
        rpc_url: &str,
        chain_id: u64,
    ) -> Result<Arc<dyn ChainClient>, ChainError> {
        let mut state = self.state.write().await;
        if state.unreachable {
            return Err(ChainError::Rpc(format!("{} unreachable", rpc_url)));
        }
        state.connections.push((rpc_url.to_string(), chain_id));
        Ok(Arc::new(self.clone()))
    }
}
