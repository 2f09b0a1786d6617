//! Compiled contract artifacts.

use std::path::Path;

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use super::error::TokenError;
use super::types::TokenCall;

/// One entry of a contract ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiEntry {
    /// Entry kind: `constructor`, `function`, `event`, `error`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Entry name (absent for constructors).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Input parameters.
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
}

/// An ABI parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl AbiEntry {
    /// Canonical signature, e.g. `allot(address,uint256)`.
    pub fn signature(&self) -> String {
        let inputs: Vec<&str> = self.inputs.iter().map(|p| p.kind.as_str()).collect();
        format!(
            "{}({})",
            self.name.as_deref().unwrap_or(&self.kind),
            inputs.join(",")
        )
    }
}

/// A compiled contract: creation bytecode and ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: Vec<AbiEntry>,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Loads and validates an artifact from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, TokenError> {
        let json = std::fs::read_to_string(path).map_err(|source| TokenError::ArtifactRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parses and validates an artifact from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, TokenError> {
        let artifact: Self =
            serde_json::from_str(json).map_err(|e| TokenError::InvalidArtifact(e.to_string()))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks the artifact matches the governance token interface.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.bytecode.is_empty() {
            return Err(TokenError::InvalidArtifact(format!(
                "{} has no creation bytecode",
                self.contract_name
            )));
        }

        let constructor = self
            .abi
            .iter()
            .find(|e| e.kind == "constructor")
            .ok_or_else(|| {
                TokenError::InvalidArtifact(format!("{} has no constructor", self.contract_name))
            })?;
        let constructor_inputs: Vec<&str> =
            constructor.inputs.iter().map(|p| p.kind.as_str()).collect();
        if constructor_inputs != ["string", "string"] {
            return Err(TokenError::InvalidArtifact(format!(
                "constructor takes ({}), expected (string,string)",
                constructor_inputs.join(",")
            )));
        }

        for required in [TokenCall::TRANSFER_OWNERSHIP, TokenCall::ALLOT] {
            if !self.has_function(required) {
                return Err(TokenError::InvalidArtifact(format!(
                    "{} is missing {}",
                    self.contract_name, required
                )));
            }
        }

        Ok(())
    }

    /// Whether the ABI declares a function with this canonical signature.
    pub fn has_function(&self, signature: &str) -> bool {
        self.abi
            .iter()
            .any(|e| e.kind == "function" && e.signature() == signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_parse_token_artifact() {
        let artifact = ContractArtifact::from_json_str(fixtures::TOKEN_ARTIFACT_JSON).unwrap();
        assert_eq!(artifact.contract_name, "GovernanceERC20");
        assert!(!artifact.bytecode.is_empty());
        assert!(artifact.has_function("transferOwnership(address)"));
        assert!(artifact.has_function("allot(address,uint256)"));
        assert!(!artifact.has_function("transfer(address,uint256)"));
    }

    #[test]
    fn test_missing_allot_is_rejected() {
        let json = r#"{
            "contractName": "Plain",
            "bytecode": "0x6080",
            "abi": [
                {"type": "constructor", "inputs": [
                    {"name": "name", "type": "string"},
                    {"name": "symbol", "type": "string"}
                ]},
                {"type": "function", "name": "transferOwnership", "inputs": [
                    {"name": "newOwner", "type": "address"}
                ]}
            ]
        }"#;

        let err = ContractArtifact::from_json_str(json).unwrap_err();
        assert!(matches!(err, TokenError::InvalidArtifact(msg) if msg.contains("allot")));
    }

    #[test]
    fn test_wrong_constructor_is_rejected() {
        let json = r#"{
            "contractName": "Odd",
            "bytecode": "0x6080",
            "abi": [
                {"type": "constructor", "inputs": [{"name": "supply", "type": "uint256"}]}
            ]
        }"#;

        let err = ContractArtifact::from_json_str(json).unwrap_err();
        assert!(matches!(err, TokenError::InvalidArtifact(msg) if msg.contains("(uint256)")));
    }

    #[test]
    fn test_empty_bytecode_is_rejected() {
        let json = r#"{"contractName": "Empty", "bytecode": "0x", "abi": []}"#;
        let err = ContractArtifact::from_json_str(json).unwrap_err();
        assert!(matches!(err, TokenError::InvalidArtifact(_)));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = ContractArtifact::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, TokenError::InvalidArtifact(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ContractArtifact::from_file(Path::new("/nonexistent/token.json")).unwrap_err();
        assert!(matches!(err, TokenError::ArtifactRead { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GovernanceERC20.json");
        std::fs::write(&path, fixtures::TOKEN_ARTIFACT_JSON).unwrap();

        let artifact = ContractArtifact::from_file(&path).unwrap();
        assert_eq!(artifact.contract_name, "GovernanceERC20");
    }
}
