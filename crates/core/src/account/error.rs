//! Error types for the account module.

use thiserror::Error;

/// Errors returned by the bundler service.
#[derive(Debug, Clone, Error)]
pub enum BundlerError {
    /// The bundler endpoint could not be reached.
    #[error("Bundler at {url} unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    /// The bundler answered but refused to resolve the account.
    #[error("Bundler rejected account resolution: {0}")]
    Rejected(String),

    /// The bundler configuration is unusable.
    #[error("Invalid bundler configuration: {0}")]
    InvalidConfig(String),
}
