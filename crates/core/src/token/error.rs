//! Error types for the token module.

use std::path::PathBuf;

use alloy_primitives::{Address, TxHash};
use thiserror::Error;

/// Errors that can occur while deploying the governance token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The contract-creation transaction failed or reverted.
    #[error("Token deployment reverted: {reason}")]
    DeploymentReverted {
        tx_hash: Option<TxHash>,
        reason: String,
    },

    /// The ownership transfer failed or reverted. The token stays deployed
    /// and owned by the deploying key.
    #[error("Ownership transfer of token {token} reverted: {reason}")]
    TransferReverted {
        token: Address,
        tx_hash: Option<TxHash>,
        reason: String,
    },

    /// A confirmation wait exceeded its bound.
    #[error("Confirmation of {tx_hash} timed out after {timeout_secs}s")]
    ConfirmationTimeout {
        tx_hash: TxHash,
        timeout_secs: u64,
        /// Set when the token was already deployed but not yet transferred.
        orphaned_token: Option<Address>,
    },

    /// The artifact file could not be read.
    #[error("Failed to read contract artifact {path}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact is malformed or lacks a required entry point.
    #[error("Invalid contract artifact: {0}")]
    InvalidArtifact(String),
}

impl TokenError {
    /// Address of a token left deployed but not handed over, if any.
    ///
    /// Such a token needs manual recovery: there is no compensating
    /// transaction.
    pub fn orphaned_token(&self) -> Option<Address> {
        match self {
            Self::TransferReverted { token, .. } => Some(*token),
            Self::ConfirmationTimeout { orphaned_token, .. } => *orphaned_token,
            _ => None,
        }
    }
}
