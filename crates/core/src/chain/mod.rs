//! Blockchain access for the provisioning pipeline.
//!
//! This module defines the `ChainClient` trait through which contract
//! deployments and contract calls are submitted, and the receipt types
//! returned once a transaction is included. The concrete JSON-RPC transport
//! is provided by the caller; the pipeline only depends on the trait.
//!
//! Every confirmation wait goes through [`await_receipt`], which bounds the
//! wait with a timeout so a stalled node never blocks a run forever.

mod confirm;
mod error;
mod traits;
mod types;

pub use confirm::await_receipt;
pub use error::ChainError;
pub use traits::{ChainClient, ChainConnector};
pub use types::{
    AbiValue, ContractCall, DeployRequest, ReceiptStatus, SigningKey, TransactionReceipt,
};
