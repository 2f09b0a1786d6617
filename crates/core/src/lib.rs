//! Provisioning pipeline for DAO instances with token-weighted voting.
//!
//! A run resolves a smart account for the admin key, deploys the governance
//! token and hands its ownership to that account, creates the DAO with a
//! token-voting plugin bound to the token, and persists the resulting
//! addresses. See [`pipeline::DaoProvisioner`].

pub mod account;
pub mod audit;
pub mod chain;
pub mod config;
pub mod dao;
pub mod metrics;
pub mod pipeline;
pub mod store;
pub mod testing;
pub mod token;

pub use account::{AccountProvisioner, BundlerConfig, BundlerConnector, BundlerError, SmartAccount};
pub use audit::{
    create_audit_system, AuditError, AuditEvent, AuditFilter, AuditHandle, AuditRecord,
    AuditStore, AuditWriter, SqliteAuditStore,
};
pub use chain::{ChainClient, ChainConnector, ChainError, SigningKey};
pub use config::{
    load_config, load_config_from_str, validate_config, ChainBackend, Config, ConfigError,
    SanitizedConfig,
};
pub use dao::{CreatedDao, DaoClient, DaoCreationError, DaoCreationStep, DaoCreator};
pub use pipeline::{
    DaoProvisioner, ProvisionerSettings, ProvisioningError, ProvisioningRequest,
    ProvisioningStage,
};
pub use store::{PersistedResult, ProvisioningResult, ResultStore, ResultStoreError, SqliteResultStore};
pub use token::{ContractArtifact, DeployedToken, TokenDeployer, TokenError};
