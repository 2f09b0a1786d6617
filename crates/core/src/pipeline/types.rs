//! Types for the provisioning pipeline.

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::BundlerError;
use crate::chain::{ChainError, SigningKey};
use crate::dao::DaoCreationError;
use crate::store::ResultStoreError;
use crate::token::TokenError;

/// A single provisioning invocation. Never persisted.
#[derive(Debug, Clone)]
pub struct ProvisioningRequest {
    pub admin_signing_key: SigningKey,
    pub rpc_endpoint: String,
}

impl ProvisioningRequest {
    pub fn new(admin_signing_key: impl Into<String>, rpc_endpoint: impl Into<String>) -> Self {
        Self {
            admin_signing_key: SigningKey::new(admin_signing_key),
            rpc_endpoint: rpc_endpoint.into(),
        }
    }
}

/// States of a provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningStage {
    Start,
    AccountProvisioned,
    TokenDeployed,
    OwnershipTransferred,
    DaoCreated,
    Persisted,
    Done,
    Failed,
}

impl ProvisioningStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::AccountProvisioned => "account_provisioned",
            Self::TokenDeployed => "token_deployed",
            Self::OwnershipTransferred => "ownership_transferred",
            Self::DaoCreated => "dao_created",
            Self::Persisted => "persisted",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ProvisioningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a provisioning run failed.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// The request itself is unusable; nothing was attempted.
    #[error("Invalid provisioning request: {0}")]
    InvalidRequest(String),

    #[error("Account provisioner unavailable: {0}")]
    ProvisionerUnavailable(BundlerError),

    #[error("Chain unavailable: {0}")]
    ChainUnavailable(#[from] ChainError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Dao(#[from] DaoCreationError),

    #[error("Result store write failed: {0}")]
    Store(#[from] ResultStoreError),
}

impl From<BundlerError> for ProvisioningError {
    fn from(err: BundlerError) -> Self {
        match err {
            BundlerError::InvalidConfig(reason) => Self::InvalidRequest(reason),
            other => Self::ProvisionerUnavailable(other),
        }
    }
}

impl ProvisioningError {
    /// Last stage the run completed before failing.
    pub fn stage(&self) -> ProvisioningStage {
        match self {
            Self::InvalidRequest(_) | Self::ProvisionerUnavailable(_) => ProvisioningStage::Start,
            Self::ChainUnavailable(_) => ProvisioningStage::AccountProvisioned,
            Self::Token(e) if e.orphaned_token().is_some() => ProvisioningStage::TokenDeployed,
            Self::Token(_) => ProvisioningStage::AccountProvisioned,
            Self::Dao(_) => ProvisioningStage::OwnershipTransferred,
            Self::Store(_) => ProvisioningStage::DaoCreated,
        }
    }

    /// Stable machine-readable error kind for audit records and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::ProvisionerUnavailable(BundlerError::Rejected(_)) => "provisioner_rejected",
            Self::ProvisionerUnavailable(_) => "provisioner_unavailable",
            Self::ChainUnavailable(_) => "chain_unavailable",
            Self::Token(TokenError::DeploymentReverted { .. }) => "deployment_reverted",
            Self::Token(TokenError::TransferReverted { .. }) => "transfer_reverted",
            Self::Token(TokenError::ConfirmationTimeout { .. }) => "confirmation_timeout",
            Self::Token(TokenError::ArtifactRead { .. } | TokenError::InvalidArtifact(_)) => {
                "invalid_artifact"
            }
            Self::Dao(DaoCreationError::MetadataPinningFailed(_)) => "metadata_pinning_failed",
            Self::Dao(DaoCreationError::PipelineIncomplete { .. }) => "pipeline_incomplete",
            Self::Dao(DaoCreationError::ConfirmationTimeout { .. }) => "confirmation_timeout",
            Self::Store(_) => "store",
        }
    }

    /// Token deployed but still owned by the admin key; needs manual recovery.
    pub fn orphaned_token(&self) -> Option<Address> {
        match self {
            Self::Token(e) => e.orphaned_token(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::IncompleteReason;

    #[test]
    fn test_request_redacts_key() {
        let request = ProvisioningRequest::new("0xKEY", "https://rpc.test");
        assert!(!format!("{:?}", request).contains("0xKEY"));
        assert_eq!(request.admin_signing_key.expose(), "0xKEY");
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(ProvisioningStage::OwnershipTransferred.to_string(), "ownership_transferred");
        let json = serde_json::to_value(ProvisioningStage::DaoCreated).unwrap();
        assert_eq!(json, "dao_created");
    }

    #[test]
    fn test_error_stage_and_kind() {
        let token = Address::repeat_byte(0x70);

        let err = ProvisioningError::from(TokenError::TransferReverted {
            token,
            tx_hash: None,
            reason: "reverted".to_string(),
        });
        assert_eq!(err.stage(), ProvisioningStage::TokenDeployed);
        assert_eq!(err.kind(), "transfer_reverted");
        assert_eq!(err.orphaned_token(), Some(token));

        let err = ProvisioningError::from(TokenError::DeploymentReverted {
            tx_hash: None,
            reason: "reverted".to_string(),
        });
        assert_eq!(err.stage(), ProvisioningStage::AccountProvisioned);
        assert_eq!(err.orphaned_token(), None);

        let err = ProvisioningError::from(DaoCreationError::PipelineIncomplete {
            steps_observed: 1,
            reason: IncompleteReason::Exhausted,
        });
        assert_eq!(err.stage(), ProvisioningStage::OwnershipTransferred);
        assert_eq!(err.kind(), "pipeline_incomplete");

        let err = ProvisioningError::from(BundlerError::Rejected("nope".to_string()));
        assert_eq!(err.stage(), ProvisioningStage::Start);
        assert_eq!(err.kind(), "provisioner_rejected");

        let err = ProvisioningError::from(BundlerError::Unreachable {
            url: "https://bundler.test".to_string(),
            reason: "connection refused".to_string(),
        });
        assert_eq!(err.kind(), "provisioner_unavailable");
    }

    #[test]
    fn test_bundler_config_error_is_invalid_request() {
        let err = ProvisioningError::from(BundlerError::InvalidConfig(
            "bundler url is empty".to_string(),
        ));

        assert!(matches!(err, ProvisioningError::InvalidRequest(ref msg) if msg == "bundler url is empty"));
        assert_eq!(err.kind(), "invalid_request");
        assert_eq!(err.stage(), ProvisioningStage::Start);
    }
}
