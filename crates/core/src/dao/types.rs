//! Types for the DAO module.

use alloy_primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};

use super::config::VotingMode;

/// A progress event from a DAO-creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DaoCreationStep {
    /// The creation transaction was submitted and awaits inclusion.
    Creating { tx_hash: TxHash },
    /// The DAO exists. `plugin_addresses[0]` is the token-voting plugin.
    Done {
        dao_address: Address,
        plugin_addresses: Vec<Address>,
    },
}

impl DaoCreationStep {
    /// Tag name used in logs, metrics and audit records.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Creating { .. } => "creating",
            Self::Done { .. } => "done",
        }
    }
}

/// Link shown on the DAO's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoMetadataLink {
    pub name: String,
    pub url: String,
}

/// Metadata document pinned to content-addressed storage before creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoMetadata {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub links: Vec<DaoMetadataLink>,
}

/// Voting parameters as the token-voting plugin stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginVotingSettings {
    pub voting_mode: VotingMode,
    /// Support threshold in parts per million.
    pub support_threshold: u32,
    /// Minimum participation in parts per million.
    pub min_participation: u32,
    pub min_duration: u64,
    pub min_proposer_voting_power: u64,
}

/// Token-voting plugin installation, bound to an existing governance token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenVotingInstall {
    /// The governance token whose balances carry voting power.
    pub token_address: Address,
    pub voting_settings: PluginVotingSettings,
}

/// Parameters of a single DAO-creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoCreationParams {
    /// Content-addressed URI of the pinned metadata.
    pub metadata_uri: String,
    /// ENS subdomain the DAO registers.
    pub ens_subdomain: String,
    /// The voting plugin to install at creation time.
    pub token_voting: TokenVotingInstall,
}

/// Final addresses of a created DAO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedDao {
    pub dao_address: Address,
    pub voting_plugin_address: Address,
}
