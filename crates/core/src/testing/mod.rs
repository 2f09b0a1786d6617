//! Test doubles for the external collaborators of the pipeline.
//!
//! The mocks record the calls they receive and accept injected failures,
//! so every stage of a provisioning run can be exercised without a chain,
//! a bundler, or a DAO backend. The CLI also wires them up as its
//! `simulated` chain backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use daoforge_core::testing::{MockBundler, MockChain, MockDaoClient, InMemoryResultStore};
//!
//! let chain = MockChain::new();
//! chain.set_revert_next_call(true).await;
//!
//! let store = InMemoryResultStore::new();
//! // ... run the provisioner, then:
//! assert_eq!(store.save_count(), 0);
//! ```

mod mock_bundler;
mod mock_chain;
mod mock_dao_client;
mod mock_result_store;

pub use mock_bundler::MockBundler;
pub use mock_chain::{MockChain, RecordedTransaction};
pub use mock_dao_client::{MockDaoClient, ScriptedStep};
pub use mock_result_store::InMemoryResultStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::account::{BundlerConfig, DEFAULT_ENTRY_POINT};
    use crate::chain::SigningKey;
    use crate::dao::{DaoMetadata, DaoMetadataLink};
    use crate::token::{ContractArtifact, TokenParams};

    /// Trimmed artifact of the governance token: real ABI shape, stub bytecode.
    pub const TOKEN_ARTIFACT_JSON: &str = r#"{
  "contractName": "GovernanceERC20",
  "abi": [
    {
      "type": "constructor",
      "inputs": [
        { "name": "name_", "type": "string" },
        { "name": "symbol_", "type": "string" }
      ]
    },
    {
      "type": "function",
      "name": "transferOwnership",
      "inputs": [{ "name": "newOwner", "type": "address" }]
    },
    {
      "type": "function",
      "name": "allot",
      "inputs": [
        { "name": "to", "type": "address" },
        { "name": "newBalance", "type": "uint256" }
      ]
    },
    {
      "type": "function",
      "name": "balanceOf",
      "inputs": [{ "name": "account", "type": "address" }]
    },
    {
      "type": "event",
      "name": "OwnershipTransferred",
      "inputs": [
        { "name": "previousOwner", "type": "address" },
        { "name": "newOwner", "type": "address" }
      ]
    }
  ],
  "bytecode": "0x608060405234801561001057600080fd5b50"
}"#;

    /// The parsed governance token artifact.
    pub fn token_artifact() -> ContractArtifact {
        ContractArtifact::from_json_str(TOKEN_ARTIFACT_JSON)
            .expect("fixture artifact is valid")
    }

    pub fn token_params() -> TokenParams {
        TokenParams {
            name: "Test Governance".to_string(),
            symbol: "TGOV".to_string(),
        }
    }

    pub fn dao_metadata() -> DaoMetadata {
        DaoMetadata {
            name: "Test DAO".to_string(),
            description: "A DAO created by the test suite".to_string(),
            avatar: None,
            links: vec![DaoMetadataLink {
                name: "Docs".to_string(),
                url: "https://docs.example".to_string(),
            }],
        }
    }

    pub fn signing_key() -> SigningKey {
        SigningKey::new("0xKEY")
    }

    pub fn bundler_config(chain_id: u64) -> BundlerConfig {
        BundlerConfig {
            url: "https://bundler.test".to_string(),
            chain_id,
            entry_point: DEFAULT_ENTRY_POINT,
        }
    }
}
