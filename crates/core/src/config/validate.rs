use super::{types::Config, ConfigError};
use crate::dao::{MAX_VOTING_DURATION_SECS, MIN_VOTING_DURATION_SECS};

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

/// Validate configuration beyond what deserialization enforces
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.chain.chain_id == 0 {
        return Err(invalid("chain.chain_id cannot be 0"));
    }
    if config.chain.confirmation_timeout_secs == 0 {
        return Err(invalid("chain.confirmation_timeout_secs cannot be 0"));
    }
    if config.chain.rpc_url.trim().is_empty() {
        return Err(invalid("chain.rpc_url cannot be empty"));
    }
    if config.bundler.url.trim().is_empty() {
        return Err(invalid("bundler.url cannot be empty"));
    }

    if config.token.name.trim().is_empty() {
        return Err(invalid("token.name cannot be empty"));
    }
    if config.token.symbol.trim().is_empty() {
        return Err(invalid("token.symbol cannot be empty"));
    }

    if config.dao.subdomain_prefix.trim().is_empty() {
        return Err(invalid("dao.subdomain_prefix cannot be empty"));
    }

    let voting = &config.dao.voting;
    for (name, value) in [
        ("min_participation", voting.min_participation),
        ("support_threshold", voting.support_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid(format!(
                "dao.voting.{} must be between 0 and 1, got {}",
                name, value
            )));
        }
    }
    if !(MIN_VOTING_DURATION_SECS..=MAX_VOTING_DURATION_SECS).contains(&voting.min_duration_secs) {
        return Err(invalid(format!(
            "dao.voting.min_duration_secs must be between {} and {}, got {}",
            MIN_VOTING_DURATION_SECS, MAX_VOTING_DURATION_SECS, voting.min_duration_secs
        )));
    }

    Ok(())
}
