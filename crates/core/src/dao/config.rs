//! Configuration for the DAO module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{DaoMetadata, DaoMetadataLink, PluginVotingSettings};

/// Shortest voting period the voting plugin accepts.
pub const MIN_VOTING_DURATION_SECS: u64 = 60 * 60;

/// Longest voting period the voting plugin accepts.
pub const MAX_VOTING_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// How votes are tallied and when proposals can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotingMode {
    /// Proposals execute only after the voting period ends.
    Standard,
    /// Proposals execute as soon as the outcome can no longer change.
    EarlyExecution,
    /// Voters may change their vote until the period ends.
    VoteReplacement,
}

/// Voting parameters of the token-voting plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingSettings {
    /// Minimum voting period in seconds.
    #[serde(default = "default_min_duration")]
    pub min_duration_secs: u64,

    /// Share of total voting power that must participate (0.0-1.0).
    #[serde(default = "default_min_participation")]
    pub min_participation: f64,

    /// Share of cast votes that must be in favour (0.0-1.0).
    #[serde(default = "default_support_threshold")]
    pub support_threshold: f64,

    /// Tokens an account must hold to create proposals.
    #[serde(default = "default_min_proposer_power")]
    pub min_proposer_voting_power: u64,

    #[serde(default = "default_voting_mode")]
    pub voting_mode: VotingMode,
}

fn default_min_duration() -> u64 {
    24 * 60 * 60 // 1 day
}

fn default_min_participation() -> f64 {
    0.25
}

fn default_support_threshold() -> f64 {
    0.5
}

fn default_min_proposer_power() -> u64 {
    1
}

fn default_voting_mode() -> VotingMode {
    VotingMode::EarlyExecution
}

impl Default for VotingSettings {
    fn default() -> Self {
        Self {
            min_duration_secs: default_min_duration(),
            min_participation: default_min_participation(),
            support_threshold: default_support_threshold(),
            min_proposer_voting_power: default_min_proposer_power(),
            voting_mode: default_voting_mode(),
        }
    }
}

impl VotingSettings {
    /// Participation threshold in parts per million, as the plugin stores it.
    pub fn min_participation_ppm(&self) -> u32 {
        ratio_to_ppm(self.min_participation)
    }

    /// Support threshold in parts per million, as the plugin stores it.
    pub fn support_threshold_ppm(&self) -> u32 {
        ratio_to_ppm(self.support_threshold)
    }

    /// Encodes these settings for the plugin installation.
    pub fn plugin_settings(&self) -> PluginVotingSettings {
        PluginVotingSettings {
            voting_mode: self.voting_mode,
            support_threshold: self.support_threshold_ppm(),
            min_participation: self.min_participation_ppm(),
            min_duration: self.min_duration_secs,
            min_proposer_voting_power: self.min_proposer_voting_power,
        }
    }
}

fn ratio_to_ppm(ratio: f64) -> u32 {
    (ratio.clamp(0.0, 1.0) * 1_000_000.0).round() as u32
}

/// DAO configuration: the metadata to pin and the plugin parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaoConfig {
    #[serde(default = "default_dao_name")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(default)]
    pub links: Vec<DaoMetadataLink>,

    /// Prefix of the ENS subdomain; a timestamp is appended per creation.
    #[serde(default = "default_subdomain_prefix")]
    pub subdomain_prefix: String,

    #[serde(default)]
    pub voting: VotingSettings,
}

fn default_dao_name() -> String {
    "Governance DAO".to_string()
}

fn default_subdomain_prefix() -> String {
    "dao".to_string()
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            name: default_dao_name(),
            description: String::new(),
            avatar: None,
            links: Vec::new(),
            subdomain_prefix: default_subdomain_prefix(),
            voting: VotingSettings::default(),
        }
    }
}

impl DaoConfig {
    /// Metadata document for this DAO.
    pub fn metadata(&self) -> DaoMetadata {
        DaoMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            avatar: self.avatar.clone(),
            links: self.links.clone(),
        }
    }

    /// Creation settings for [`super::DaoCreator`].
    pub fn settings(&self) -> DaoSettings {
        DaoSettings {
            subdomain_prefix: self.subdomain_prefix.clone(),
            voting: self.voting.clone(),
        }
    }
}

/// Settings applied to every DAO-creation call.
#[derive(Debug, Clone, PartialEq)]
pub struct DaoSettings {
    pub subdomain_prefix: String,
    pub voting: VotingSettings,
}

impl Default for DaoSettings {
    fn default() -> Self {
        DaoConfig::default().settings()
    }
}

impl DaoSettings {
    /// ENS subdomain for a DAO created at `now`: `{prefix}-{unix seconds}`.
    pub fn ens_subdomain(&self, now: DateTime<Utc>) -> String {
        format!("{}-{}", self.subdomain_prefix, now.timestamp()).to_lowercase()
    }
}
