//! Types for the chain module.

use std::fmt;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An administrative signing key.
///
/// The key material is opaque to the pipeline and handed as-is to the
/// bundler and chain clients. `Debug` and `Display` never print it; use
/// [`SigningKey::fingerprint`] to correlate keys in logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SigningKey(String);

impl SigningKey {
    /// Wraps raw key material.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key material. Only signing backends should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the key material is empty.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Short, non-reversible identifier for logs and audit records.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        format!("{:x}", digest)[..12].to_string()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({})", self.fingerprint())
    }
}

impl fmt::Display for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key:{}", self.fingerprint())
    }
}

/// A value passed as a constructor or function argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AbiValue {
    Address(Address),
    String(String),
    Uint(U256),
}

/// A contract-creation transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Creation bytecode.
    pub bytecode: Bytes,
    /// Constructor arguments, in declaration order.
    pub constructor_args: Vec<AbiValue>,
}

impl DeployRequest {
    pub fn new(bytecode: impl Into<Bytes>, constructor_args: Vec<AbiValue>) -> Self {
        Self {
            bytecode: bytecode.into(),
            constructor_args,
        }
    }
}

/// A call to a deployed contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Target contract.
    pub to: Address,
    /// Canonical function signature, e.g. `transferOwnership(address)`.
    pub signature: &'static str,
    /// Arguments, in declaration order.
    pub args: Vec<AbiValue>,
}

/// Outcome of an included transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Receipt of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Hash of the included transaction.
    pub tx_hash: TxHash,
    /// Execution status.
    pub status: ReceiptStatus,
    /// Address of the created contract, for contract-creation transactions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    /// Block the transaction was included in.
    pub block_number: u64,
}

impl TransactionReceipt {
    /// Whether the transaction executed without reverting.
    pub fn succeeded(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}
