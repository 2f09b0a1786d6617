//! Configuration for the token module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::types::TokenParams;

/// Governance token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token name passed to the constructor.
    #[serde(default = "default_name")]
    pub name: String,

    /// Token symbol passed to the constructor.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Path to the compiled contract artifact (hardhat JSON format).
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,
}

fn default_name() -> String {
    "Governance Token".to_string()
}

fn default_symbol() -> String {
    "GOV".to_string()
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("artifacts/GovernanceERC20.json")
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            artifact_path: default_artifact_path(),
        }
    }
}

impl TokenConfig {
    /// Constructor parameters for the token.
    pub fn params(&self) -> TokenParams {
        TokenParams {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TokenConfig::default();
        assert_eq!(config.name, "Governance Token");
        assert_eq!(config.symbol, "GOV");
        assert_eq!(
            config.artifact_path,
            PathBuf::from("artifacts/GovernanceERC20.json")
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let toml = r#"
            symbol = "VOTE"
        "#;
        let config: TokenConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.name, "Governance Token");
        assert_eq!(config.params().symbol, "VOTE");
    }
}
