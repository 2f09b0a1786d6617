//! Governance token deployment.
//!
//! The token is deployed from a fixed contract artifact (bytecode plus ABI,
//! produced by the contract toolchain) and its administrative ownership is
//! then handed to the provisioned smart account. Both transactions must be
//! confirmed in order: ownership is never transferred for a contract whose
//! creation has not been included yet.
//!
//! The contract has zero decimals and exposes `allot(address,uint256)`, which
//! later sets a holder's balance to an absolute target by minting or burning
//! the difference. Pipeline code never calls it, but the artifact loader
//! insists on its presence so a wrong artifact is caught before any gas is
//! spent.

mod artifact;
mod config;
mod deployer;
mod error;
mod types;

pub use artifact::{AbiEntry, AbiParam, ContractArtifact};
pub use config::TokenConfig;
pub use deployer::TokenDeployer;
pub use error::TokenError;
pub use types::{DeployedToken, TokenCall, TokenParams};
