//! Provisioning pipeline.
//!
//! Drives one request through a linear state machine:
//! `Start → AccountProvisioned → TokenDeployed → OwnershipTransferred →
//! DaoCreated → Persisted → Done`. Any failure ends the run; nothing is
//! persisted unless every stage succeeded, and nothing already submitted on
//! chain is rolled back.

mod config;
mod runner;
mod types;

pub use config::ProvisionerSettings;
pub use runner::DaoProvisioner;
pub use types::{ProvisioningError, ProvisioningRequest, ProvisioningStage};
