//! Error types for the chain module.

use alloy_primitives::{Address, TxHash};
use thiserror::Error;

/// Errors returned by a chain client.
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    /// The RPC endpoint could not be reached or returned a transport error.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The node rejected the transaction before inclusion.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// A call targeted an address with no confirmed contract deployment.
    #[error("No confirmed contract at {0}")]
    UnknownContract(Address),

    /// Receipt requested for a transaction the node never saw.
    #[error("Unknown transaction: {0}")]
    UnknownTransaction(TxHash),

    /// Waiting for inclusion exceeded the configured bound.
    #[error("Confirmation of {tx_hash} timed out after {timeout_secs}s")]
    ConfirmationTimeout { tx_hash: TxHash, timeout_secs: u64 },
}
