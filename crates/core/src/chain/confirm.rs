//! Bounded confirmation waits.

use std::time::Duration;

use alloy_primitives::TxHash;
use tracing::debug;

use super::{ChainClient, ChainError, TransactionReceipt};

/// Waits for the receipt of `tx_hash`, failing with
/// [`ChainError::ConfirmationTimeout`] once `timeout` elapses.
pub async fn await_receipt(
    client: &dyn ChainClient,
    tx_hash: TxHash,
    timeout: Duration,
) -> Result<TransactionReceipt, ChainError> {
    debug!(%tx_hash, timeout_secs = timeout.as_secs(), "Waiting for receipt");

    match tokio::time::timeout(timeout, client.wait_for_receipt(tx_hash)).await {
        Ok(result) => result,
        Err(_) => Err(ChainError::ConfirmationTimeout {
            tx_hash,
            timeout_secs: timeout.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{AbiValue, DeployRequest, SigningKey};
    use crate::testing::MockChain;

    #[tokio::test]
    async fn test_await_receipt_returns_receipt() {
        let chain = MockChain::new();
        let signer = SigningKey::new("0xKEY");
        let tx_hash = chain
            .deploy_contract(
                &signer,
                DeployRequest::new(vec![0x60u8, 0x80], vec![AbiValue::String("x".into())]),
            )
            .await
            .unwrap();

        let receipt = await_receipt(&chain, tx_hash, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(receipt.tx_hash, tx_hash);
        assert!(receipt.contract_address.is_some());
    }

    #[tokio::test]
    async fn test_await_receipt_times_out() {
        let chain = MockChain::new();
        chain.set_receipt_delay(Duration::from_millis(200)).await;
        let signer = SigningKey::new("0xKEY");
        let tx_hash = chain
            .deploy_contract(&signer, DeployRequest::new(vec![0x60u8], vec![]))
            .await
            .unwrap();

        let err = await_receipt(&chain, tx_hash, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ChainError::ConfirmationTimeout { tx_hash: h, .. } if h == tx_hash
        ));
    }
}
