//! Types for the token module.

use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

use crate::chain::{AbiValue, ContractCall};

/// Constructor parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
}

impl TokenParams {
    /// Constructor arguments in declaration order: `(name, symbol)`.
    pub fn constructor_args(&self) -> Vec<AbiValue> {
        vec![
            AbiValue::String(self.name.clone()),
            AbiValue::String(self.symbol.clone()),
        ]
    }
}

/// A deployed token whose ownership has been handed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedToken {
    /// Address of the token contract.
    pub contract_address: Address,
    /// Administrative owner (the smart account).
    pub owner_address: Address,
    /// Contract-creation transaction.
    pub deploy_tx: TxHash,
    /// Ownership-transfer transaction.
    pub transfer_tx: TxHash,
}

/// Calls accepted by the governance token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCall {
    /// Hands administrative control to `new_owner`.
    TransferOwnership { new_owner: Address },
    /// Sets `to`'s balance to exactly `new_balance`, minting or burning the delta.
    Allot { to: Address, new_balance: U256 },
}

impl TokenCall {
    pub const TRANSFER_OWNERSHIP: &'static str = "transferOwnership(address)";
    pub const ALLOT: &'static str = "allot(address,uint256)";

    /// Builds the contract call against the token at `token`.
    pub fn into_call(self, token: Address) -> ContractCall {
        match self {
            Self::TransferOwnership { new_owner } => ContractCall {
                to: token,
                signature: Self::TRANSFER_OWNERSHIP,
                args: vec![AbiValue::Address(new_owner)],
            },
            Self::Allot { to, new_balance } => ContractCall {
                to: token,
                signature: Self::ALLOT,
                args: vec![AbiValue::Address(to), AbiValue::Uint(new_balance)],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_args_order() {
        let params = TokenParams {
            name: "Governance Token".to_string(),
            symbol: "GOV".to_string(),
        };
        assert_eq!(
            params.constructor_args(),
            vec![
                AbiValue::String("Governance Token".to_string()),
                AbiValue::String("GOV".to_string()),
            ]
        );
    }

    #[test]
    fn test_transfer_ownership_call() {
        let token = Address::repeat_byte(0xaa);
        let owner = Address::repeat_byte(0xbb);

        let call = TokenCall::TransferOwnership { new_owner: owner }.into_call(token);
        assert_eq!(call.to, token);
        assert_eq!(call.signature, "transferOwnership(address)");
        assert_eq!(call.args, vec![AbiValue::Address(owner)]);
    }

    #[test]
    fn test_allot_call() {
        let token = Address::repeat_byte(0xaa);
        let holder = Address::repeat_byte(0xcc);

        let call = TokenCall::Allot {
            to: holder,
            new_balance: U256::from(42),
        }
        .into_call(token);
        assert_eq!(call.signature, "allot(address,uint256)");
        assert_eq!(call.args[1], AbiValue::Uint(U256::from(42)));
    }
}
