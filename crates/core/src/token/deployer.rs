//! Token deployer implementation.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, TxHash};
use tracing::{info, warn};

use super::artifact::ContractArtifact;
use super::error::TokenError;
use super::types::{DeployedToken, TokenCall, TokenParams};
use crate::chain::{await_receipt, ChainClient, ChainError, DeployRequest, SigningKey};

/// Deploys the governance token and hands its ownership to a smart account.
#[derive(Clone)]
pub struct TokenDeployer {
    artifact: Arc<ContractArtifact>,
    confirmation_timeout: Duration,
}

impl TokenDeployer {
    pub fn new(artifact: Arc<ContractArtifact>, confirmation_timeout: Duration) -> Self {
        Self {
            artifact,
            confirmation_timeout,
        }
    }

    /// Deploys the token, waits for inclusion, then transfers ownership to
    /// `owner` and waits again.
    ///
    /// The second transaction is only submitted once the first one is
    /// confirmed with a contract address.
    pub async fn deploy_token(
        &self,
        chain: &dyn ChainClient,
        signer: &SigningKey,
        owner: Address,
        params: &TokenParams,
    ) -> Result<DeployedToken, TokenError> {
        let (deploy_tx, contract_address) = self.deploy(chain, signer, params).await?;

        let transfer_tx = self
            .transfer_ownership(chain, signer, contract_address, owner)
            .await?;

        Ok(DeployedToken {
            contract_address,
            owner_address: owner,
            deploy_tx,
            transfer_tx,
        })
    }

    /// Submits the token deployment and waits for inclusion.
    ///
    /// Returns the creation transaction and the confirmed contract address.
    pub async fn deploy(
        &self,
        chain: &dyn ChainClient,
        signer: &SigningKey,
        params: &TokenParams,
    ) -> Result<(TxHash, Address), TokenError> {
        let request = DeployRequest::new(
            self.artifact.bytecode.clone(),
            params.constructor_args(),
        );

        let tx_hash = chain
            .deploy_contract(signer, request)
            .await
            .map_err(|e| TokenError::DeploymentReverted {
                tx_hash: None,
                reason: e.to_string(),
            })?;
        info!(
            %tx_hash,
            contract = %self.artifact.contract_name,
            name = %params.name,
            symbol = %params.symbol,
            "Submitted token deployment"
        );

        let receipt = await_receipt(chain, tx_hash, self.confirmation_timeout)
            .await
            .map_err(|e| match e {
                ChainError::ConfirmationTimeout {
                    tx_hash,
                    timeout_secs,
                } => TokenError::ConfirmationTimeout {
                    tx_hash,
                    timeout_secs,
                    orphaned_token: None,
                },
                other => TokenError::DeploymentReverted {
                    tx_hash: Some(tx_hash),
                    reason: other.to_string(),
                },
            })?;

        if !receipt.succeeded() {
            return Err(TokenError::DeploymentReverted {
                tx_hash: Some(tx_hash),
                reason: format!("reverted in block {}", receipt.block_number),
            });
        }
        let contract_address =
            receipt
                .contract_address
                .ok_or_else(|| TokenError::DeploymentReverted {
                    tx_hash: Some(tx_hash),
                    reason: "receipt carries no contract address".to_string(),
                })?;

        info!(token = %contract_address, block = receipt.block_number, "Token deployed");
        Ok((tx_hash, contract_address))
    }

    /// Hands `token` to `owner` and waits for inclusion.
    ///
    /// `token` must come from a confirmed [`Self::deploy`]. Failures leave
    /// the token owned by `signer` and report it as orphaned.
    pub async fn transfer_ownership(
        &self,
        chain: &dyn ChainClient,
        signer: &SigningKey,
        token: Address,
        owner: Address,
    ) -> Result<TxHash, TokenError> {
        let call = TokenCall::TransferOwnership { new_owner: owner }.into_call(token);

        let tx_hash = chain
            .send_transaction(signer, call)
            .await
            .map_err(|e| TokenError::TransferReverted {
                token,
                tx_hash: None,
                reason: e.to_string(),
            })?;
        info!(%tx_hash, %token, new_owner = %owner, "Submitted ownership transfer");

        let receipt = await_receipt(chain, tx_hash, self.confirmation_timeout)
            .await
            .map_err(|e| match e {
                ChainError::ConfirmationTimeout {
                    tx_hash,
                    timeout_secs,
                } => TokenError::ConfirmationTimeout {
                    tx_hash,
                    timeout_secs,
                    orphaned_token: Some(token),
                },
                other => TokenError::TransferReverted {
                    token,
                    tx_hash: Some(tx_hash),
                    reason: other.to_string(),
                },
            })?;

        if !receipt.succeeded() {
            warn!(%token, %tx_hash, "Ownership transfer reverted, token left with deploying key");
            return Err(TokenError::TransferReverted {
                token,
                tx_hash: Some(tx_hash),
                reason: format!("reverted in block {}", receipt.block_number),
            });
        }

        info!(%token, owner = %owner, "Token ownership transferred");
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{AbiValue, ContractCall};
    use crate::testing::{fixtures, MockChain, RecordedTransaction};

    fn deployer(timeout: Duration) -> TokenDeployer {
        TokenDeployer::new(Arc::new(fixtures::token_artifact()), timeout)
    }

    #[tokio::test]
    async fn test_deploy_then_transfer() {
        let chain = MockChain::new();
        let owner = Address::repeat_byte(0x42);
        let signer = SigningKey::new("0xKEY");

        let token = deployer(Duration::from_secs(5))
            .deploy_token(&chain, &signer, owner, &fixtures::token_params())
            .await
            .unwrap();

        assert_eq!(token.owner_address, owner);
        assert_ne!(token.contract_address, Address::ZERO);
        assert_eq!(chain.owner_of(token.contract_address).await, Some(owner));

        let recorded = chain.recorded_transactions().await;
        assert_eq!(recorded.len(), 2);
        match &recorded[0] {
            RecordedTransaction::Deploy { request, .. } => {
                assert_eq!(request.constructor_args, fixtures::token_params().constructor_args());
            }
            other => panic!("expected deployment first, got {:?}", other),
        }
        match &recorded[1] {
            RecordedTransaction::Call { call, .. } => {
                assert_eq!(
                    call,
                    &ContractCall {
                        to: token.contract_address,
                        signature: TokenCall::TRANSFER_OWNERSHIP,
                        args: vec![AbiValue::Address(owner)],
                    }
                );
            }
            other => panic!("expected ownership transfer second, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transfer_to_unconfirmed_contract_is_rejected() {
        let chain = MockChain::new();
        let signer = SigningKey::new("0xKEY");

        let tx_hash = chain
            .deploy_contract(&signer, DeployRequest::new(vec![0x60u8], vec![]))
            .await
            .unwrap();
        let pending = chain.pending_contract_address(tx_hash).await.unwrap();

        let call = TokenCall::TransferOwnership {
            new_owner: Address::repeat_byte(0x01),
        }
        .into_call(pending);
        let err = chain.send_transaction(&signer, call).await.unwrap_err();

        assert!(matches!(err, ChainError::UnknownContract(addr) if addr == pending));
    }

    #[tokio::test]
    async fn test_steps_can_run_separately() {
        let chain = MockChain::new();
        let signer = SigningKey::new("0xKEY");
        let owner = Address::repeat_byte(0x42);
        let deployer = deployer(Duration::from_secs(5));

        let (deploy_tx, token) = deployer
            .deploy(&chain, &signer, &fixtures::token_params())
            .await
            .unwrap();
        assert_ne!(deploy_tx, TxHash::ZERO);
        assert_eq!(chain.recorded_transactions().await.len(), 1);
        assert_eq!(chain.owner_of(token).await, None);

        deployer
            .transfer_ownership(&chain, &signer, token, owner)
            .await
            .unwrap();
        assert_eq!(chain.owner_of(token).await, Some(owner));
    }

    #[tokio::test]
    async fn test_deployment_revert() {
        let chain = MockChain::new();
        chain.set_revert_next_deploy(true).await;

        let err = deployer(Duration::from_secs(5))
            .deploy_token(
                &chain,
                &SigningKey::new("0xKEY"),
                Address::repeat_byte(0x42),
                &fixtures::token_params(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TokenError::DeploymentReverted { tx_hash: Some(_), .. }));
        assert_eq!(err.orphaned_token(), None);
        // No ownership transfer was attempted.
        assert_eq!(chain.recorded_transactions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_deployment_submission_failure() {
        let chain = MockChain::new();
        chain
            .set_next_error(ChainError::Rpc("connection refused".to_string()))
            .await;

        let err = deployer(Duration::from_secs(5))
            .deploy_token(
                &chain,
                &SigningKey::new("0xKEY"),
                Address::repeat_byte(0x42),
                &fixtures::token_params(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TokenError::DeploymentReverted { tx_hash: None, .. }));
    }

    #[tokio::test]
    async fn test_transfer_revert_leaves_orphaned_token() {
        let chain = MockChain::new();
        chain.set_revert_next_call(true).await;

        let err = deployer(Duration::from_secs(5))
            .deploy_token(
                &chain,
                &SigningKey::new("0xKEY"),
                Address::repeat_byte(0x42),
                &fixtures::token_params(),
            )
            .await
            .unwrap_err();

        let orphaned = err.orphaned_token().expect("token should be reported");
        assert!(matches!(err, TokenError::TransferReverted { .. }));
        assert_eq!(chain.owner_of(orphaned).await, None);
    }

    #[tokio::test]
    async fn test_confirmation_timeout() {
        let chain = MockChain::new();
        chain.set_receipt_delay(Duration::from_millis(300)).await;

        let err = deployer(Duration::from_millis(20))
            .deploy_token(
                &chain,
                &SigningKey::new("0xKEY"),
                Address::repeat_byte(0x42),
                &fixtures::token_params(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TokenError::ConfirmationTimeout {
                orphaned_token: None,
                ..
            }
        ));
    }
}
