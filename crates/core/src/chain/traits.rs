//! Trait definitions for the chain module.

use std::sync::Arc;

use alloy_primitives::TxHash;
use async_trait::async_trait;

use super::error::ChainError;
use super::types::{ContractCall, DeployRequest, SigningKey, TransactionReceipt};

/// A client able to submit transactions to a chain and report their inclusion.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the name of this client implementation.
    fn name(&self) -> &str;

    /// Submits a contract-creation transaction signed by `signer`.
    ///
    /// Returns as soon as the node accepted the transaction; the contract
    /// address is only known once the receipt is available.
    async fn deploy_contract(
        &self,
        signer: &SigningKey,
        request: DeployRequest,
    ) -> Result<TxHash, ChainError>;

    /// Submits a call to an already deployed contract.
    async fn send_transaction(
        &self,
        signer: &SigningKey,
        call: ContractCall,
    ) -> Result<TxHash, ChainError>;

    /// Waits until the transaction is included and returns its receipt.
    ///
    /// Implementations may wait indefinitely; callers bound the wait with
    /// [`super::await_receipt`].
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, ChainError>;
}

/// Opens chain clients for a given RPC endpoint.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    /// Connects to the node at `rpc_url` serving `chain_id`.
    async fn connect(
        &self,
        rpc_url: &str,
        chain_id: u64,
    ) -> Result<Arc<dyn ChainClient>, ChainError>;
}
