//! Trait definitions for the DAO module.

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::error::DaoClientError;
use super::types::{DaoCreationParams, DaoCreationStep, DaoMetadata};

/// Lazy, ordered, single-pass stream of creation progress.
pub type DaoStepStream = BoxStream<'static, Result<DaoCreationStep, DaoClientError>>;

/// A client able to create DAOs with an installed voting plugin.
#[async_trait]
pub trait DaoClient: Send + Sync {
    /// Returns the name of this client implementation.
    fn name(&self) -> &str;

    /// Pins the metadata document and returns its content-addressed URI.
    async fn pin_metadata(&self, metadata: &DaoMetadata) -> Result<String, DaoClientError>;

    /// Submits the creation and returns its progress stream.
    ///
    /// Nothing is awaited here; the submission and every confirmation happen
    /// while the stream is drained. Each call creates a new DAO.
    fn create_dao(&self, params: DaoCreationParams) -> DaoStepStream;
}
