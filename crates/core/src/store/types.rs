//! Types for the result store.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ResultStoreError;

/// Addresses produced by a successful provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningResult {
    pub dao_address: Address,
    pub token_voting_plugin_address: Address,
    pub erc20_token_address: Address,
}

impl ProvisioningResult {
    /// Rejects results with any zero address.
    pub fn ensure_complete(&self) -> Result<(), ResultStoreError> {
        let fields = [
            ("dao_address", self.dao_address),
            ("token_voting_plugin_address", self.token_voting_plugin_address),
            ("erc20_token_address", self.erc20_token_address),
        ];
        match fields.iter().find(|(_, address)| *address == Address::ZERO) {
            Some((name, _)) => Err(ResultStoreError::Incomplete(name)),
            None => Ok(()),
        }
    }
}

/// A result as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedResult {
    #[serde(flatten)]
    pub result: ProvisioningResult,
    pub run_id: String,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> ProvisioningResult {
        ProvisioningResult {
            dao_address: Address::repeat_byte(0xd0),
            token_voting_plugin_address: Address::repeat_byte(0xa1),
            erc20_token_address: Address::repeat_byte(0x70),
        }
    }

    #[test]
    fn test_ensure_complete() {
        assert!(result().ensure_complete().is_ok());

        let partial = ProvisioningResult {
            token_voting_plugin_address: Address::ZERO,
            ..result()
        };
        let err = partial.ensure_complete().unwrap_err();
        assert!(matches!(
            err,
            ResultStoreError::Incomplete("token_voting_plugin_address")
        ));
    }

    #[test]
    fn test_persisted_result_is_flat() {
        let persisted = PersistedResult {
            result: result(),
            run_id: "run-1".to_string(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_value(&persisted).unwrap();
        let dao: Address = serde_json::from_value(json["dao_address"].clone()).unwrap();
        assert_eq!(dao, result().dao_address);
        assert_eq!(json["run_id"], "run-1");

        let parsed: PersistedResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, persisted);
    }
}
