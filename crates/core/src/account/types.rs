//! Types for the account module.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::chain::SigningKey;

/// Canonical ERC-4337 v0.6 entry point, deployed at the same address on every chain.
pub const DEFAULT_ENTRY_POINT: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");

/// Bundler service coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlerConfig {
    /// Bundler endpoint URL.
    pub url: String,
    /// Chain the account lives on.
    pub chain_id: u64,
    /// Entry-point contract the account is bound to.
    pub entry_point: Address,
}

/// A counterfactual smart-contract account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartAccount {
    /// Deterministic account address.
    pub address: Address,
    /// Key controlling the account.
    pub signing_key: SigningKey,
    /// Bundler endpoint the address was resolved through.
    pub bundler_endpoint: String,
    /// Chain the account lives on.
    pub chain_id: u64,
}
