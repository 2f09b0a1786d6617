//! Remote account provisioning.
//!
//! Resolves the counterfactual smart-contract account that will administer
//! the governance token. The address is derived by the bundler service from
//! the signing key, the chain id and the entry-point contract; nothing is
//! deployed at this stage, so provisioning the same key twice yields the same
//! account.

mod error;
mod provisioner;
mod traits;
mod types;

pub use error::BundlerError;
pub use provisioner::AccountProvisioner;
pub use traits::{BundlerClient, BundlerConnector};
pub use types::{BundlerConfig, SmartAccount, DEFAULT_ENTRY_POINT};
