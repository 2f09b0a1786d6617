use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment prefix for overrides, e.g. `DAOFORGE_CHAIN__RPC_URL`
pub const ENV_PREFIX: &str = "DAOFORGE_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::VotingMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r#"
[chain]
rpc_url = "https://rpc.test"
chain_id = 5

[bundler]
url = "https://bundler.test"

[token]
name = "Guild Token"
symbol = "GLD"

[dao.voting]
voting_mode = "vote_replacement"
"#;

    #[test]
    fn test_load_config_from_str_valid() {
        let config = load_config_from_str(VALID).unwrap();
        assert_eq!(config.chain.chain_id, 5);
        assert_eq!(config.token.symbol, "GLD");
        assert_eq!(config.dao.voting.voting_mode, VotingMode::VoteReplacement);
    }

    #[test]
    fn test_load_config_from_str_missing_chain() {
        let toml = r#"
[bundler]
url = "https://bundler.test"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_from_str_bad_entry_point() {
        let toml = r#"
[chain]
rpc_url = "https://rpc.test"
chain_id = 5

[bundler]
url = "https://bundler.test"
entry_point = "not-an-address"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config(Path::new("/nonexistent/daoforge.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", VALID).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.bundler.url, "https://bundler.test");
        assert_eq!(config.token.name, "Guild Token");
    }
}
